//! Data Transfer Objects for API requests

use phonebill_services::{AppendRequest, FetchRequest};
use serde::Deserialize;

/// Phone call parameters, from a query string or a form body
///
/// `callerNumber` and `calleeNumber` are accepted as aliases. Unknown
/// parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallParams {
    pub customer: Option<String>,

    #[serde(alias = "callerNumber")]
    pub caller: Option<String>,

    #[serde(alias = "calleeNumber")]
    pub callee: Option<String>,

    pub begin: Option<String>,

    pub end: Option<String>,
}

fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary.filter(|v| !v.trim().is_empty()).or(fallback)
}

impl CallParams {
    /// Fill parameters missing here from `fallback`
    pub fn or(self, fallback: CallParams) -> CallParams {
        CallParams {
            customer: pick(self.customer, fallback.customer),
            caller: pick(self.caller, fallback.caller),
            callee: pick(self.callee, fallback.callee),
            begin: pick(self.begin, fallback.begin),
            end: pick(self.end, fallback.end),
        }
    }
}

impl From<CallParams> for FetchRequest {
    fn from(params: CallParams) -> Self {
        FetchRequest {
            customer: params.customer,
            begin: params.begin,
            end: params.end,
        }
    }
}

impl From<CallParams> for AppendRequest {
    fn from(params: CallParams) -> Self {
        AppendRequest {
            customer: params.customer,
            caller: params.caller,
            callee: params.callee,
            begin: params.begin,
            end: params.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(customer: Option<&str>, caller: Option<&str>) -> CallParams {
        CallParams {
            customer: customer.map(str::to_string),
            caller: caller.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_or_prefers_non_empty_primary() {
        let merged = params(Some("Dave"), Some("")).or(params(Some("Eve"), Some("503-245-2345")));
        assert_eq!(merged.customer.as_deref(), Some("Dave"));
        assert_eq!(merged.caller.as_deref(), Some("503-245-2345"));
        assert_eq!(merged.callee, None);
    }
}
