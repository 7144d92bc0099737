//! Request parameterizer
//!
//! Builds the query for one request in three layers: dynamic values (location
//! and API key), then static defaults that never overwrite them, then the
//! pagination cursor, which always wins.

use super::types::{LocationStrategy, StreamDescriptor};
use crate::config::{keys, TapConfig};
use crate::error::{Error, Result};
use crate::pagination::PageCursor;
use crate::types::QueryParams;

/// Query parameters for the next request of a stream
pub fn build_params(
    descriptor: &StreamDescriptor,
    config: &TapConfig,
    cursor: Option<&PageCursor>,
) -> Result<QueryParams> {
    let mut params = QueryParams::new();

    match &descriptor.location {
        LocationStrategy::PointLocation { param, setting } => {
            let place = require(descriptor, config, setting)?;
            params.insert(param.clone(), place.to_string());
        }
        LocationStrategy::CoordinateLocation {
            lat_setting,
            lon_setting,
        } => {
            let lat = coordinate(descriptor, config, lat_setting, 90.0)?;
            let lon = coordinate(descriptor, config, lon_setting, 180.0)?;
            params.insert("lat".to_string(), lat);
            params.insert("lon".to_string(), lon);
        }
    }

    let api_key = require(descriptor, config, keys::API_KEY)?;
    params.insert("appid".to_string(), api_key.to_string());

    let defaults = descriptor
        .static_params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(config.setting(keys::UNITS).map(|v| ("units", v)))
        .chain(config.setting(keys::LANG).map(|v| ("lang", v)));
    for (key, value) in defaults {
        params
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    if let Some(cursor) = cursor {
        params.extend(
            cursor
                .params()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    Ok(params)
}

/// Fetch a setting or fail with `MissingConfig` for this stream
fn require<'a>(descriptor: &StreamDescriptor, config: &'a TapConfig, setting: &str) -> Result<&'a str> {
    config
        .setting(setting)
        .ok_or_else(|| Error::missing_config(&descriptor.name, setting))
}

/// A coordinate setting, checked to be a number within +/- `bound`
fn coordinate(
    descriptor: &StreamDescriptor,
    config: &TapConfig,
    setting: &str,
    bound: f64,
) -> Result<String> {
    let raw = require(descriptor, config, setting)?;
    let value: f64 = raw
        .parse()
        .map_err(|_| Error::invalid_config(setting, format!("'{raw}' is not a number")))?;

    if !value.is_finite() || value.abs() > bound {
        return Err(Error::invalid_config(
            setting,
            format!("{value} is outside -{bound}..={bound}"),
        ));
    }

    Ok(raw.to_string())
}
