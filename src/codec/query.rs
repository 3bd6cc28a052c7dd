// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Query string and form body decoding

use std::collections::HashMap;

use url::form_urlencoded;

use crate::har::{Param, QueryParameter};

/// Decode a raw query string into HAR query parameters.
///
/// Repeated names are concatenated into one value rather than emitted as a
/// multi-valued parameter; this is a deliberate lossy simplification.
/// Emission order follows the first occurrence of each name.
pub fn query_to_query_params(query: &str) -> Vec<QueryParameter> {
    let mut params: Vec<QueryParameter> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        match seen.get(name.as_ref()) {
            Some(&index) => params[index].value.push_str(&value),
            None => {
                seen.insert(name.to_string(), params.len());
                params.push(QueryParameter::new(name, value));
            }
        }
    }

    params
}

/// Decode a form-encoded body into HAR post parameters
pub fn form_data_to_params(data: &str) -> Vec<Param> {
    query_to_query_params(data)
        .into_iter()
        .map(|param| Param::new(param.name, param.value))
        .collect()
}
