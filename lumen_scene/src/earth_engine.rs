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

//! an `ImageryProvider` for the Google Earth Engine v1 REST API.
//! see https://developers.google.com/earth-engine/reference/rest
//!
//! Scene search is a `value:compute` call that only retrieves the number of matching scenes - the
//! scene itself stays a (lazy) computation graph that is evaluated on the server when the
//! thumbnail is rendered. Rendering creates a thumbnail resource (`projects/*/thumbnails`) and
//! returns the `getPixels` URL for it

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, header::{HeaderMap, HeaderValue}};
use serde::{Serialize,Deserialize};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};
use lumen_common::{config::env_expand, datetime::{utc_now, TimeWindow}, net::send_json};

use crate::{
    boundary::Boundary,
    errors::{op_failed, provider_error, LumenSceneError, Result},
    expression::{self, expression},
    provider::{ImageryProvider, SceneHandle, VisParams},
};

pub const USER_PROJECT_HEADER: &str = "x-goog-user-project";

/// refreshed access tokens are renewed if they expire within this many seconds
const TOKEN_EXPIRY_MARGIN: i64 = 60;

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct EarthEngineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// cloud project the session is tied to. Can contain ${VAR} references
    pub project: String,

    /// static OAuth2 bearer token, only used if there are no `credentials`. Can (and should) contain
    /// ${VAR} references. Note that tokens from `gcloud auth print-access-token` expire after about an
    /// hour, long running servers should use `credentials` instead
    #[serde(default)]
    pub access_token: String,

    /// refreshable OAuth2 user credentials
    #[serde(default)]
    pub credentials: Option<OAuthCredentials>,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// scene property we sort on to get the least cloudy scene
    #[serde(default = "default_cloud_property")]
    pub cloud_property: String,
}

fn default_base_url()->String { "https://earthengine.googleapis.com".to_string() }
fn default_api_version()->String { "v1".to_string() }
fn default_collection()->String { "COPERNICUS/S2_SR".to_string() }
fn default_cloud_property()->String { "CLOUDY_PIXEL_PERCENTAGE".to_string() }
fn default_token_url()->String { "https://oauth2.googleapis.com/token".to_string() }

impl Default for EarthEngineConfig {
    fn default()->Self {
        EarthEngineConfig {
            base_url: default_base_url(),
            api_version: default_api_version(),
            project: "${EE_PROJECT}".to_string(),
            access_token: "${EE_ACCESS_TOKEN}".to_string(),
            credentials: None,
            collection: default_collection(),
            cloud_property: default_cloud_property(),
        }
    }
}

/// OAuth2 user credentials (as stored by `earthengine authenticate`) that are exchanged for short
/// lived access tokens at `token_url`. All values can contain ${VAR} references
#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct OAuthCredentials {
    #[serde(default = "default_token_url")]
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl OAuthCredentials {
    fn expanded (&self)->Result<Self> {
        Ok( OAuthCredentials {
            token_url: self.token_url.clone(),
            client_id: env_expand( &self.client_id)?,
            client_secret: env_expand( &self.client_secret)?,
            refresh_token: env_expand( &self.refresh_token)?,
        })
    }
}

/// the response of a token refresh request
#[derive(Deserialize,Debug)]
struct TokenResponse {
    access_token: String,
    expires_in: i64, // seconds
}

struct CachedToken {
    token: String,
    expires: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid_at (&self, now: DateTime<Utc>)->bool {
        now + TimeDelta::seconds( TOKEN_EXPIRY_MARGIN) < self.expires
    }
}

enum Authorization {
    Static(String),
    Refreshing { credentials: OAuthCredentials, cached: Mutex<Option<CachedToken>> },
}

/// the response of a thumbnail create request
#[derive(Deserialize,Debug)]
struct Thumbnail {
    name: String,
}

/// the authenticated session. This is created once and then shared read-only between requests,
/// only the cached access token of refreshable credentials changes over time
pub struct EarthEngine {
    client: Client,
    authorization: Authorization,
    api_url: String,      // e.g. https://earthengine.googleapis.com/v1
    project_path: String, // projects/<project>
    collection: String,
    cloud_property: String,
}

impl EarthEngine {

    /// create the session and verify it with a trivial computation. This fails if credentials or
    /// project are rejected, which should abort the application
    pub async fn connect (config: &EarthEngineConfig)->Result<Self> {
        let ee = Self::new( config)?;
        ee.check_session().await?;
        info!("connected to Earth Engine at {} as {}", ee.api_url, ee.project_path);
        Ok(ee)
    }

    /// create the session without verifying it
    pub fn new (config: &EarthEngineConfig)->Result<Self> {
        let project = env_expand( &config.project)?;
        if project.is_empty() { return Err( op_failed("no Earth Engine project configured")) }

        let authorization = match &config.credentials {
            Some(credentials) => Authorization::Refreshing { credentials: credentials.expanded()?, cached: Mutex::new(None) },
            None => {
                let access_token = env_expand( &config.access_token)?;
                if access_token.is_empty() { return Err( op_failed("no Earth Engine access token or credentials configured")) }
                Authorization::Static( access_token)
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert( USER_PROJECT_HEADER, HeaderValue::from_str( &project).map_err( |_| op_failed("invalid project id"))?);

        let client = Client::builder().default_headers( headers).build()?;
        let api_url = format!("{}/{}", config.base_url.trim_end_matches('/'), config.api_version);
        let project_path = format!("projects/{}", project);

        Ok( EarthEngine {
            client,
            authorization,
            api_url,
            project_path,
            collection: config.collection.clone(),
            cloud_property: config.cloud_property.clone()
        })
    }

    /// the bearer token for the next request, refreshing it first if it is about to expire
    async fn access_token (&self)->Result<String> {
        match &self.authorization {
            Authorization::Static(token) => Ok( token.clone()),
            Authorization::Refreshing { credentials, cached } => {
                let mut cached = cached.lock().await;
                if let Some(token) = cached.as_ref().filter( |t| t.is_valid_at( utc_now())) {
                    return Ok( token.token.clone())
                }

                let token = self.refresh_token( credentials).await?;
                let access_token = token.token.clone();
                *cached = Some(token);
                Ok(access_token)
            }
        }
    }

    async fn refresh_token (&self, credentials: &OAuthCredentials)->Result<CachedToken> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
        ];
        let response: TokenResponse = send_json( self.client.post( &credentials.token_url).form( &params)).await?;
        debug!("refreshed Earth Engine access token, expires in {}s", response.expires_in);

        Ok( CachedToken { token: response.access_token, expires: utc_now() + TimeDelta::seconds( response.expires_in) })
    }

    async fn post<T,U> (&self, url: &str, data: &T)->Result<U> where T: Serialize + ?Sized, U: DeserializeOwned {
        let access_token = self.access_token().await?;
        Ok( send_json( self.client.post( url).bearer_auth( access_token).json( data)).await? )
    }

    pub async fn check_session (&self)->Result<()> {
        let res = self.compute( expression( expression::constant(1))).await?;
        if res.as_i64() == Some(1) {
            Ok(())
        } else {
            Err( provider_error( format!("unexpected session check result: {}", res)))
        }
    }

    /// evaluate an expression on the server and return its (JSON) result
    pub async fn compute (&self, expr: Value)->Result<Value> {
        let url = format!("{}/{}/value:compute", self.api_url, self.project_path);
        let mut response: Value = self.post( &url, &json!({ "expression": expr })).await?;
        Ok( response.get_mut("result").map( Value::take).unwrap_or( Value::Null))
    }

    /// the catalog scenes within `window` that intersect `boundary`, least cloudy first
    pub fn sorted_collection (&self, boundary: &Boundary, window: &TimeWindow)->Value {
        let geometry = expression::polygon( &boundary.polygon);

        let collection = expression::load_image_collection( &self.collection);
        let collection = expression::filter_date( collection, window);
        let collection = expression::filter_bounds( collection, geometry);
        expression::sort_ascending( collection, &self.cloud_property)
    }

    /// the body of a thumbnail create request for `scene`
    pub fn thumbnail_request (&self, scene: &SceneHandle, boundary: &Boundary, vis_params: &VisParams)->Value {
        let geometry = expression::polygon( &boundary.polygon);

        let image = expression::clip_to_bounds_and_scale( scene.as_value().clone(), geometry, vis_params.dimensions);
        let image = expression::visualize( image, &vis_params.bands, vis_params.min, vis_params.max);

        json!({
            "expression": expression( image),
            "fileFormat": vis_params.format.file_format()
        })
    }

    pub fn pixels_url (&self, thumbnail_name: &str)->String {
        format!("{}/{}:getPixels", self.api_url, thumbnail_name)
    }
}

#[async_trait]
impl ImageryProvider for EarthEngine {

    async fn search_least_cloudy (&self, boundary: &Boundary, window: &TimeWindow)->Result<SceneHandle> {
        let collection = self.sorted_collection( boundary, window);

        let n_scenes = self.compute( expression( expression::size( collection.clone()))).await?;
        debug!("{} {} scenes within {}", n_scenes, self.collection, window);
        if n_scenes.as_u64().unwrap_or(0) == 0 {
            return Err( LumenSceneError::NoSceneFound( window.to_string()))
        }

        let geometry = expression::polygon( &boundary.polygon);
        let scene = expression::clip( expression::first( collection), geometry);
        Ok( SceneHandle::new( scene))
    }

    async fn render (&self, scene: SceneHandle, boundary: &Boundary, vis_params: &VisParams)->Result<String> {
        let url = format!("{}/{}/thumbnails", self.api_url, self.project_path);
        let request = self.thumbnail_request( &scene, boundary, vis_params);

        let thumbnail: Thumbnail = self.post( &url, &request).await?;
        Ok( self.pixels_url( &thumbnail.name))
    }
}
