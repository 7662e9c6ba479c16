/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! the boundary polygon of a scene request, extracted from a JSON request body of the form
//! ```
//! {"geo_json": {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[lon,lat], ...], ...]}}}
//! ```

use geo_types::Polygon;
use serde_json::Value;
use lumen_common::geo::{polygon_from_geometry_value, position_count};

use crate::errors::{LumenSceneError, Result};

#[derive(Debug,Clone,PartialEq)]
pub struct Boundary {
    /// the `coordinates` value of the request geometry, exactly as it was received
    pub coordinates: Value,
    pub polygon: Polygon<f64>,
}

impl Boundary {
    pub fn from_request_body (body: &[u8])->Result<Self> {
        let request: Value = serde_json::from_slice( body)?;
        Self::from_request_value( &request)
    }

    /// validation order matters: missing input is reported before unsupported geometry, and
    /// coordinates are only parsed once both discriminants check out
    pub fn from_request_value (request: &Value)->Result<Self> {
        let geo_json = match request.get("geo_json") {
            Some(v) if !is_empty_value(v) => v,
            _ => return Err( LumenSceneError::MissingInput)
        };

        if geo_json.get("type").and_then( Value::as_str) != Some("Feature") {
            return Err( LumenSceneError::UnsupportedGeometry)
        }

        let geometry = geo_json.get("geometry").unwrap_or( &Value::Null);
        if geometry.get("type").and_then( Value::as_str) != Some("Polygon") {
            return Err( LumenSceneError::UnsupportedGeometry)
        }

        let coordinates = geometry.get("coordinates").cloned().unwrap_or( Value::Null);
        let polygon = polygon_from_geometry_value( geometry)?;

        Ok( Boundary { coordinates, polygon } )
    }

    /// wrap a bare GeoJSON Feature into a request value and parse it
    pub fn from_feature_value (feature: Value)->Result<Self> {
        let mut request = serde_json::Map::new();
        request.insert( "geo_json".to_string(), feature);
        Self::from_request_value( &Value::Object(request))
    }

    pub fn position_count (&self)->usize {
        position_count( &self.polygon)
    }
}

/// null, false, 0, "", [] and {} do not count as provided input
fn is_empty_value (v: &Value)->bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
