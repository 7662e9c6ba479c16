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

//! lumen_scene looks up the least cloudy recent satellite scene for a polygon boundary and returns
//! the URL of a true color thumbnail that is clipped to this boundary. Catalog search and rendering
//! are delegated to an external imagery platform (Google Earth Engine), we only assemble the query
//! and relay the result. The service is exposed as a single HTTP endpoint
//!
//!     POST /get-satellite-image
//!     {"geo_json": {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[lon,lat], ...]]}}}

use std::path::Path;
use serde::{Serialize,Deserialize};
use tracing::info;
use lumen_common::config::{find_config_file, load_config};
use lumen_server::ServerConfig;

pub mod errors;
pub mod boundary;
pub mod provider;
pub mod expression;
pub mod earth_engine;
pub mod service;

pub use errors::{LumenSceneError, Result};
pub use boundary::Boundary;
pub use provider::{ImageryProvider, SceneHandle, VisParams, ImageFormat};
pub use earth_engine::{EarthEngine, EarthEngineConfig, OAuthCredentials};
pub use service::{SceneService, ThumbnailResponse, router, SATELLITE_IMAGE_ROUTE, SCENE_WINDOW_DAYS};

pub const CONFIG_FILE: &str = "scene_server.ron";

#[derive(Deserialize,Serialize,Debug,Clone,Default)]
pub struct SceneServerConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub earth_engine: EarthEngineConfig,
}

/// load the config from an explicit path, or from a `scene_server.ron` found by the standard config
/// lookup, or fall back to defaults (which take the Earth Engine project and token from the environment)
pub fn load_scene_config (path: Option<&Path>)->Result<SceneServerConfig> {
    if let Some(path) = path {
        return Ok( load_config( path)? )
    }

    if let Some(path) = find_config_file( CONFIG_FILE) {
        info!("using config {:?}", path);
        Ok( load_config( &path)? )
    } else {
        info!("no {} found, using default config", CONFIG_FILE);
        Ok( SceneServerConfig::default() )
    }
}
