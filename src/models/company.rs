use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAddress {
    pub city: Option<String>,
    pub state_or_country: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionAddresses {
    pub business: Option<SubmissionAddress>,
    pub mailing: Option<SubmissionAddress>,
}

/// The subset of `data.sec.gov/submissions/CIK##########.json` we read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionHeader {
    pub name: Option<String>,
    pub sic: Option<String>,
    pub sic_description: Option<String>,
    pub state_of_incorporation: Option<String>,
    #[serde(default)]
    pub addresses: SubmissionAddresses,
}

/// Header details attached to a filing during enrichment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CompanyMetadata {
    pub name: Option<String>,
    pub sic: Option<String>,
    pub sic_description: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<SubmissionHeader> for CompanyMetadata {
    fn from(header: SubmissionHeader) -> Self {
        let business = header.addresses.business.unwrap_or_default();
        let mailing = header.addresses.mailing.unwrap_or_default();

        // Incorporation state first, then where the company actually sits
        let state = non_empty(header.state_of_incorporation.as_ref())
            .or_else(|| non_empty(business.state_or_country.as_ref()))
            .or_else(|| non_empty(mailing.state_or_country.as_ref()));

        Self {
            name: non_empty(header.name.as_ref()),
            sic: non_empty(header.sic.as_ref()),
            sic_description: non_empty(header.sic_description.as_ref()),
            state,
            city: non_empty(business.city.as_ref()),
            zip: non_empty(business.zip_code.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_prefers_incorporation() {
        let header: SubmissionHeader = serde_json::from_str(
            r#"{
                "name": "Apple Inc.",
                "sic": "3571",
                "sicDescription": "Electronic Computers",
                "stateOfIncorporation": "CA",
                "addresses": {
                    "business": {"city": "CUPERTINO", "stateOrCountry": "CA", "zipCode": "95014"},
                    "mailing": {"city": "CUPERTINO", "stateOrCountry": "CA", "zipCode": "95014"}
                }
            }"#,
        )
        .unwrap();
        let meta = CompanyMetadata::from(header);
        assert_eq!(meta.state.as_deref(), Some("CA"));
        assert_eq!(meta.sic.as_deref(), Some("3571"));
        assert_eq!(meta.city.as_deref(), Some("CUPERTINO"));
        assert_eq!(meta.zip.as_deref(), Some("95014"));
    }

    #[test]
    fn test_state_falls_back_to_addresses() {
        let header: SubmissionHeader = serde_json::from_str(
            r#"{
                "name": "Acme Corp",
                "stateOfIncorporation": "",
                "addresses": {
                    "business": {"city": "Austin", "stateOrCountry": ""},
                    "mailing": {"stateOrCountry": "TX"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(CompanyMetadata::from(header).state.as_deref(), Some("TX"));

        let header: SubmissionHeader = serde_json::from_str(r#"{"name": "Bare"}"#).unwrap();
        let meta = CompanyMetadata::from(header);
        assert_eq!(meta.state, None);
        assert_eq!(meta.sic, None);
    }
}
