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

//! the narrow capability interface of external imagery platforms. Catalog search, sorting, clipping
//! and rendering all happen on the provider side, we only hold opaque handles to its results

use async_trait::async_trait;
use serde::{Serialize,Deserialize};
use serde_json::Value;
use lumen_common::datetime::TimeWindow;

use crate::{boundary::Boundary, errors::Result};

/// reference to a (clipped) scene that lives on the provider side. Only the provider that
/// created it knows what is inside
#[derive(Debug,Clone,PartialEq)]
pub struct SceneHandle(Value);

impl SceneHandle {
    pub fn new (v: Value)->Self { SceneHandle(v) }
    pub fn as_value (&self)->&Value { &self.0 }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn file_format (&self)->&'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
        }
    }
}

/// visualization parameters for thumbnail rendering
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub bands: Vec<String>,
    pub dimensions: u32, // size of the long edge in pixels
    pub format: ImageFormat,
}

impl VisParams {
    /// Sentinel-2 true color: red, green, blue reflectance bands stretched over [0,3000]
    pub fn true_color ()->Self {
        VisParams {
            min: 0.0,
            max: 3000.0,
            bands: vec!["B4".to_string(), "B3".to_string(), "B2".to_string()],
            dimensions: 1024,
            format: ImageFormat::Png,
        }
    }
}

impl Default for VisParams {
    fn default()->Self { Self::true_color() }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// find the scene with the smallest cloud cover within `window` that intersects `boundary`,
    /// clipped to `boundary`
    async fn search_least_cloudy (&self, boundary: &Boundary, window: &TimeWindow)->Result<SceneHandle>;

    /// render `scene` restricted to the `boundary` region and return the URL of the rendered image
    async fn render (&self, scene: SceneHandle, boundary: &Boundary, vis_params: &VisParams)->Result<String>;
}
