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

use std::path::Path;
use anyhow::Result;
use lumen_scene::{load_scene_config, SceneServerConfig, VisParams, ImageFormat, CONFIG_FILE};

#[test]
fn test_scene_server_config()->Result<()> {
    let path = Path::new( env!("CARGO_MANIFEST_DIR")).join("configs").join( CONFIG_FILE);
    let config = load_scene_config( Some( &path))?;
    println!("{config:#?}");

    assert_eq!( config.server.port, 5000);
    assert_eq!( config.server.port_env.as_deref(), Some("PORT"));
    assert!( config.server.host.is_unspecified());
    assert!( config.server.tls.is_none());

    let ee = &config.earth_engine;
    assert_eq!( ee.collection, "COPERNICUS/S2_SR");
    assert_eq!( ee.cloud_property, "CLOUDY_PIXEL_PERCENTAGE");
    assert_eq!( ee.access_token, "${EE_ACCESS_TOKEN}"); // expanded on connect, not on load
    Ok(())
}

#[test]
fn test_minimal_config()->Result<()> {
    let config: SceneServerConfig = ron::from_str( r#"
        SceneServerConfig(
            earth_engine: EarthEngineConfig( project: "my-project", access_token: "${MY_TOKEN}" )
        )"#)?;

    assert_eq!( config.server.port, 5000);
    assert_eq!( config.earth_engine.base_url, "https://earthengine.googleapis.com");
    assert_eq!( config.earth_engine.api_version, "v1");
    assert_eq!( config.earth_engine.project, "my-project");
    Ok(())
}

#[test]
fn test_credentials_config()->Result<()> {
    let config: SceneServerConfig = ron::from_str( r#"
        SceneServerConfig(
            earth_engine: EarthEngineConfig(
                project: "my-project",
                credentials: Some(OAuthCredentials(
                    client_id: "${EE_CLIENT_ID}",
                    client_secret: "${EE_CLIENT_SECRET}",
                    refresh_token: "${EE_REFRESH_TOKEN}",
                )),
            )
        )"#)?;

    assert!( config.earth_engine.access_token.is_empty());
    let credentials = config.earth_engine.credentials.expect("credentials");
    assert_eq!( credentials.token_url, "https://oauth2.googleapis.com/token");
    assert_eq!( credentials.refresh_token, "${EE_REFRESH_TOKEN}");
    Ok(())
}

#[test]
fn test_missing_config_file() {
    let res = load_scene_config( Some( Path::new("no/such/scene_server.ron")));
    assert!( res.is_err());
}

#[test]
fn test_vis_params() {
    let vis = VisParams::true_color();
    assert_eq!( vis.min, 0.0);
    assert_eq!( vis.max, 3000.0);
    assert_eq!( vis.bands, vec!["B4", "B3", "B2"]);
    assert_eq!( vis.dimensions, 1024);
    assert_eq!( vis.format, ImageFormat::Png);
    assert_eq!( vis, VisParams::default());
}
