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

use std::sync::{Arc, Mutex};
use anyhow::Result;
use async_trait::async_trait;
use axum::{Router, body::{Body, to_bytes}, http::{HeaderMap, Request, StatusCode, header}};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use lumen_common::datetime::TimeWindow;
use lumen_scene::{router, Boundary, ImageryProvider, LumenSceneError, SceneHandle, SceneService, VisParams, SATELLITE_IMAGE_ROUTE};

/// a provider that renders fake URLs and records what it was asked for
#[derive(Default)]
struct FakeProvider {
    fail_with: Option<String>,
    windows: Mutex<Vec<TimeWindow>>,
    renders: Mutex<Vec<VisParams>>,
}

#[async_trait]
impl ImageryProvider for FakeProvider {
    async fn search_least_cloudy (&self, boundary: &Boundary, window: &TimeWindow)->lumen_scene::Result<SceneHandle> {
        self.windows.lock().unwrap().push( *window);
        if let Some(msg) = &self.fail_with {
            return Err( LumenSceneError::ProviderError( msg.clone()))
        }
        Ok( SceneHandle::new( json!({ "positions": boundary.position_count() })))
    }

    async fn render (&self, scene: SceneHandle, _boundary: &Boundary, vis_params: &VisParams)->lumen_scene::Result<String> {
        self.renders.lock().unwrap().push( vis_params.clone());
        Ok( format!("https://thumbs.example.com/scene-{}.png", scene.as_value()["positions"]))
    }
}

async fn post (router: Router, body: &str)->Result<(StatusCode, HeaderMap, Value)> {
    let request = Request::post( SATELLITE_IMAGE_ROUTE)
        .header( header::CONTENT_TYPE, "application/json")
        .body( Body::from( body.to_string()))?;
    let response = router.oneshot( request).await?;

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes( response.into_body(), usize::MAX).await?;
    Ok( (status, headers, serde_json::from_slice( &bytes)?) )
}

fn assert_cors_headers (headers: &HeaderMap) {
    assert_eq!( headers.get( header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert_eq!( headers.get( header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "Content-Type");
    assert_eq!( headers.get( header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "POST");
}

#[tokio::test]
async fn test_polygon_feature()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));
    let body = r#"{"geo_json": {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[10,10],[10,20],[20,20],[20,10],[10,10]]]}}}"#;

    let (status, headers, response) = post( router( service.clone()), body).await?;
    println!("{status} {response:#}");

    assert_eq!( status, StatusCode::OK);
    assert_cors_headers( &headers);
    assert_eq!( response["status"], "success");
    assert_eq!( response["image_url"], "https://thumbs.example.com/scene-5.png");
    assert_eq!( response["bounds"], json!([[[10,10],[10,20],[20,20],[20,10],[10,10]]]));

    let renders = service.provider().renders.lock().unwrap();
    assert_eq!( renders.as_slice(), &[VisParams::true_color()]);
    Ok(())
}

#[tokio::test]
async fn test_bounds_are_echoed_verbatim()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));
    let coordinates = json!([
        [[-122.51, 37.70],[-122.35, 37.70],[-122.35, 37.83],[-122.51, 37.83],[-122.51, 37.70]],
        [[-122.45, 37.75],[-122.40, 37.75],[-122.40, 37.78],[-122.45, 37.75]]
    ]);
    let body = json!({ "geo_json": { "type": "Feature", "properties": {"name": "sf"}, "geometry": { "type": "Polygon", "coordinates": coordinates } } });

    let (status, _, response) = post( router( service), &body.to_string()).await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( response["bounds"], coordinates);
    Ok(())
}

#[tokio::test]
async fn test_large_polygon()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));

    // a detailed 120k vertex ring around (-120,38)
    let n = 120_000;
    let mut ring: Vec<[f64;2]> = (0..n).map( |i| {
        let a = std::f64::consts::TAU * (i as f64) / (n as f64);
        [-120.0 + 0.5 * a.cos(), 38.0 + 0.5 * a.sin()]
    }).collect();
    ring.push( ring[0]);
    let coordinates = json!([ring]);

    let body = json!({ "geo_json": { "type": "Feature", "geometry": { "type": "Polygon", "coordinates": coordinates } } }).to_string();
    assert!( body.len() > 2 * 1024 * 1024); // above axum's default body limit

    let (status, headers, response) = post( router( service), &body).await?;
    assert_eq!( status, StatusCode::OK);
    assert_cors_headers( &headers);
    assert_eq!( response["status"], "success");
    assert_eq!( response["image_url"], format!("https://thumbs.example.com/scene-{}.png", n + 1));
    assert_eq!( response["bounds"], coordinates);
    Ok(())
}

#[tokio::test]
async fn test_time_window()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));
    let body = r#"{"geo_json": {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[0,0]]]}}}"#;

    let before = chrono::Utc::now();
    post( router( service.clone()), body).await?;
    post( router( service.clone()), body).await?;
    let after = chrono::Utc::now();

    let windows = service.provider().windows.lock().unwrap();
    assert_eq!( windows.len(), 2); // recomputed for each request
    for w in windows.iter() {
        assert_eq!( w.duration(), chrono::TimeDelta::days(90));
        assert!( w.end >= before && w.end <= after);
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_geojson()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));

    for body in [ r#"{}"#, r#"{"geo_json": null}"#, r#"{"geo_json": ""}"#, r#"{"other": 1}"# ] {
        let (status, headers, response) = post( router( service.clone()), body).await?;
        assert_eq!( status, StatusCode::BAD_REQUEST);
        assert_cors_headers( &headers);
        assert_eq!( response, json!({ "status": "error", "message": "No GeoJSON provided" }));
    }

    assert!( service.provider().windows.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unsupported_geometry()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));
    let bodies = [
        r#"{"geo_json": {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[10,10],[20,20]]}}}"#,
        r#"{"geo_json": {"type": "Polygon", "coordinates": [[[10,10],[10,20],[20,20],[10,10]]]}}"#,
        r#"{"geo_json": {"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": []}}}"#,
    ];

    for body in bodies {
        let (status, headers, response) = post( router( service.clone()), body).await?;
        assert_eq!( status, StatusCode::BAD_REQUEST);
        assert_cors_headers( &headers);
        assert_eq!( response, json!({ "status": "error", "message": "Only Polygon Feature GeoJSON is supported" }));
    }
    Ok(())
}

#[tokio::test]
async fn test_provider_failure()->Result<()> {
    let provider = FakeProvider { fail_with: Some("User memory limit exceeded.".to_string()), ..Default::default() };
    let service = Arc::new( SceneService::new( provider));
    let body = r#"{"geo_json": {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[10,10],[10,20],[20,20],[20,10],[10,10]]]}}}"#;

    let (status, headers, response) = post( router( service), body).await?;
    assert_eq!( status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers( &headers);
    assert_eq!( response, json!({ "status": "error", "message": "User memory limit exceeded." }));
    Ok(())
}

#[tokio::test]
async fn test_malformed_coordinates()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));
    let body = r#"{"geo_json": {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[10,10],[20,20]]}}}"#;

    let (status, _, response) = post( router( service.clone()), body).await?;
    assert_eq!( status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!( response["status"], "error");
    assert!( response["message"].as_str().is_some_and( |m| !m.is_empty()));
    assert!( service.provider().windows.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_preflight()->Result<()> {
    let service = Arc::new( SceneService::new( FakeProvider::default()));
    let request = Request::options( SATELLITE_IMAGE_ROUTE).body( Body::empty())?;
    let response = router( service).oneshot( request).await?;

    assert_eq!( response.status(), StatusCode::OK);
    assert_cors_headers( response.headers());
    Ok(())
}
