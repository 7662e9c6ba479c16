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

//! the image lookup service: validate a boundary request, find the least cloudy recent scene for
//! it and relay the thumbnail URL the provider renders for it

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use tracing::{info, warn};
use lumen_common::datetime::TimeWindow;
use lumen_server::{preflight, with_cors_headers, with_request_tracing};

use crate::{
    boundary::Boundary,
    errors::Result,
    provider::{ImageryProvider, VisParams},
};

pub const SATELLITE_IMAGE_ROUTE: &str = "/get-satellite-image";

/// number of days (ending now) we search for scenes
pub const SCENE_WINDOW_DAYS: u32 = 90;

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ThumbnailResponse {
    Success { image_url: String, bounds: Value },
    Error { message: String },
}

pub struct SceneService<P> {
    provider: P,
    vis_params: VisParams,
    window_days: u32,
}

impl <P> SceneService<P> where P: ImageryProvider {
    pub fn new (provider: P)->Self {
        SceneService { provider, vis_params: VisParams::true_color(), window_days: SCENE_WINDOW_DAYS }
    }

    pub fn provider (&self)->&P { &self.provider }

    pub fn vis_params (&self)->&VisParams { &self.vis_params }

    /// the thumbnail URL of the least cloudy scene intersecting `boundary` within the last `window_days`
    pub async fn lookup (&self, boundary: &Boundary)->Result<String> {
        let window = TimeWindow::last_days( self.window_days);
        info!("searching scenes within {} for boundary with {} positions", window, boundary.position_count());

        let scene = self.provider.search_least_cloudy( boundary, &window).await?;
        self.provider.render( scene, boundary, &self.vis_params).await
    }

    /// process a raw request body. This never fails - errors are turned into error responses
    pub async fn handle (&self, body: &[u8])->(StatusCode, ThumbnailResponse) {
        match self.handle_request( body).await {
            Ok(response) => (StatusCode::OK, response),
            Err(e) => {
                if e.is_client_error() {
                    info!("rejected request: {}", e);
                } else {
                    warn!("scene lookup failed: {}", e);
                }
                (e.status_code(), ThumbnailResponse::Error { message: e.to_string() })
            }
        }
    }

    async fn handle_request (&self, body: &[u8])->Result<ThumbnailResponse> {
        let boundary = Boundary::from_request_body( body)?;
        let image_url = self.lookup( &boundary).await?;
        info!("rendered scene thumbnail {}", image_url);

        Ok( ThumbnailResponse::Success { image_url, bounds: boundary.coordinates })
    }
}

/// the router for our single endpoint, including CORS and request tracing layers.
/// Request bodies are not size limited since detailed boundaries can easily exceed axum's 2MB default,
/// and any rejection has to come back as a JSON error response from `SceneService::handle`
pub fn router<P> (service: Arc<SceneService<P>>)->Router where P: ImageryProvider + 'static {
    let router = Router::new()
        .route( SATELLITE_IMAGE_ROUTE, post( get_satellite_image::<P>).options( preflight))
        .layer( DefaultBodyLimit::disable())
        .with_state( service);

    with_cors_headers( with_request_tracing( router))
}

async fn get_satellite_image<P> (State(service): State<Arc<SceneService<P>>>, body: Bytes)->Response where P: ImageryProvider + 'static {
    let (status, response) = service.handle( &body).await;
    (status, Json(response)).into_response()
}
