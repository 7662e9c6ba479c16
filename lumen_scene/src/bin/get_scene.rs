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

//! command line tool to look up the thumbnail URL for a GeoJSON polygon feature file, e.g.
//!
//!     get_scene my_area.geojson
//!
//! The file can either hold a bare Feature or a complete request object (`{"geo_json": {...}}`)

use std::path::PathBuf;
use clap::Parser;
use anyhow::Result;
use serde_json::Value;

use lumen_server::init_tracing;
use lumen_scene::{load_scene_config, Boundary, EarthEngine, SceneService};

#[derive(Parser)]
#[command(about = "least cloudy satellite scene lookup tool")]
struct CliOpts {
    /// pathname of RON config (default is scene_server.ron in $LUMEN_CONFIG_DIR or ./configs)
    #[arg(long)]
    config: Option<PathBuf>,

    /// pathname of GeoJSON file with polygon feature
    geojson: PathBuf,
}

#[tokio::main]
async fn main ()->Result<()> {
    init_tracing();
    let opts = CliOpts::parse();

    let input: Value = serde_json::from_slice( &std::fs::read( &opts.geojson)?)?;
    let boundary = if input.get("geo_json").is_some() {
        Boundary::from_request_value( &input)?
    } else {
        Boundary::from_feature_value( input)?
    };

    let config = load_scene_config( opts.config.as_deref())?;
    let service = SceneService::new( EarthEngine::connect( &config.earth_engine).await?);

    let url = service.lookup( &boundary).await?;
    println!("{}", url);

    Ok(())
}
