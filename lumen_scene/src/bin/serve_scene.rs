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

//! serve least cloudy satellite scene thumbnails on
//!
//!     POST <host>:<port>/get-satellite-image
//!
//! The Earth Engine session is established once before we start serving. If that fails (bad
//! credentials, unknown project) we exit without serving anything

use std::{path::PathBuf, sync::Arc};
use clap::Parser;
use anyhow::Result;

use lumen_server::{init_tracing, spawn_server_task};
use lumen_scene::{load_scene_config, router, EarthEngine, SceneService};

#[derive(Parser)]
#[command(about = "least cloudy satellite scene thumbnail server")]
struct CliOpts {
    /// pathname of RON config (default is scene_server.ron in $LUMEN_CONFIG_DIR or ./configs)
    #[arg(long)]
    config: Option<PathBuf>,

    /// port to listen on (overrides config and $PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main ()->Result<()> {
    init_tracing();
    let opts = CliOpts::parse();

    let config = load_scene_config( opts.config.as_deref())?;
    let server_config = match opts.port {
        Some(port) => config.server.clone().with_port(port),
        None => config.server.clone()
    };

    let earth_engine = EarthEngine::connect( &config.earth_engine).await?;
    let service = Arc::new( SceneService::new( earth_engine));

    let server_task = spawn_server_task( &server_config, router( service)).await?;
    Ok( server_task.await?? )
}
