//! Wire types of the Google Fitness REST API (v1), limited to the fields read here.

use serde::{Deserialize, Serialize};

/// A feed of samples registered against the user's account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    #[serde(default)]
    pub data_stream_id: String,
    #[serde(default)]
    pub data_stream_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

impl DataSource {
    pub fn new(data_stream_id: impl Into<String>, data_stream_name: impl Into<String>) -> Self {
        Self {
            data_stream_id: data_stream_id.into(),
            data_stream_name: data_stream_name.into(),
            r#type: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDataSourcesResponse {
    #[serde(default)]
    pub data_source: Vec<DataSource>,
}

/// Points of one data source inside a time range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_start_time_ns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_end_time_ns: Option<String>,
    #[serde(default)]
    pub point: Vec<DataPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_nanos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_nanos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_name: Option<String>,
    #[serde(default)]
    pub value: Vec<Value>,
}

impl DataPoint {
    pub fn with_values(value: Vec<Value>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

/// A typed sample value; exactly one field is set by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp_val: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_val: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_val: Option<String>,
}

impl Value {
    pub fn fp(value: f64) -> Self {
        Self {
            fp_val: Some(value),
            ..Default::default()
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            int_val: Some(value),
            ..Default::default()
        }
    }
}
