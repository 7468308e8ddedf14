use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque attributes that travel with a data share.
///
/// Pipeline stages carry this through untouched; only the packaging stages
/// downstream read the Prio parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataShareMetadata {
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_servers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hamming_weight: Option<i32>,
}

impl DataShareMetadata {
    pub fn new(metric_name: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            epsilon: None,
            prime: None,
            bins: None,
            number_servers: None,
            hamming_weight: None,
        }
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn prime(mut self, prime: i64) -> Self {
        self.prime = Some(prime);
        self
    }

    pub fn bins(mut self, bins: i32) -> Self {
        self.bins = Some(bins);
        self
    }

    pub fn number_servers(mut self, number_servers: i32) -> Self {
        self.number_servers = Some(number_servers);
        self
    }

    pub fn hamming_weight(mut self, hamming_weight: i32) -> Self {
        self.hamming_weight = Some(hamming_weight);
        self
    }
}

/// One unit of ingested analytics data.
///
/// `created_ms` is epoch milliseconds. `None` means the upstream collector had
/// no creation time for the share; it is never the same thing as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataShare {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_ms: Option<i64>,
    #[serde(rename = "dataShareMetadata")]
    pub metadata: DataShareMetadata,
}

impl DataShare {
    /// Create a share without a creation timestamp.
    pub fn new(path: impl Into<String>, metadata: DataShareMetadata) -> Self {
        Self {
            path: path.into(),
            created_ms: None,
            metadata,
        }
    }

    /// Set the creation timestamp (epoch milliseconds).
    pub fn with_created_ms(mut self, created_ms: i64) -> Self {
        self.created_ms = Some(created_ms);
        self
    }

    /// Creation time as a UTC datetime, if present and representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_ms.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}
