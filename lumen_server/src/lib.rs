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

//! HTTP server plumbing for lumen services: server configuration, server task creation and the
//! response layers (CORS headers, request tracing) every service router gets

use std::{net::{IpAddr, Ipv4Addr, SocketAddr}, path::PathBuf};

use axum::{Router, http::{header, HeaderName, HeaderValue, StatusCode}};
use axum_server::tls_rustls::RustlsConfig;
use serde::{Deserialize,Serialize};
use tokio::task::JoinHandle;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lumen_common::config::env_expand;

pub mod errors;
use errors::{LumenServerError, LumenServerResult};

type Result<T> = LumenServerResult<T>;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PORT_ENV: &str = "PORT";

/// the headers we add to every response so that browser clients from any origin can POST JSON
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST"),
];

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// name of an environment variable that overrides `port` if set
    #[serde(default = "default_port_env")]
    pub port_env: Option<String>,

    #[serde(default)]
    pub tls: Option<TlsConfig>, // if set use TLS (https)
}

fn default_host()->IpAddr { IpAddr::V4( Ipv4Addr::UNSPECIFIED) }
fn default_port()->u16 { DEFAULT_PORT }
fn default_port_env()->Option<String> { Some(DEFAULT_PORT_ENV.to_string()) }

impl Default for ServerConfig {
    fn default()->Self {
        ServerConfig { host: default_host(), port: default_port(), port_env: default_port_env(), tls: None }
    }
}

impl ServerConfig {
    /// explicit port (e.g. from the command line) that takes precedence over `port_env`
    pub fn with_port (mut self, port: u16)->Self {
        self.port = port;
        self.port_env = None;
        self
    }

    pub fn sock_addr (&self)->Result<SocketAddr> {
        self.sock_addr_with( |name| std::env::var(name).ok())
    }

    pub fn sock_addr_with<F> (&self, lookup: F)->Result<SocketAddr> where F: Fn(&str)->Option<String> {
        let port = match self.port_env.as_deref().and_then( |name| lookup(name)) {
            Some(value) => value.trim().parse::<u16>().map_err( |_| LumenServerError::InvalidPort(value.clone()))?,
            None => self.port
        };
        Ok( SocketAddr::new( self.host, port))
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct TlsConfig {
    pub cert_path: String, // path to PEM encoded certificate, can contain ${VAR} references
    pub key_path: String,  // path to PEM encoded key data, can contain ${VAR} references
}

/// bind the configured socket and spawn the server task for `router`.
/// Binding (and TLS setup) happens before this returns so that startup errors are reported to the caller
pub async fn spawn_server_task (config: &ServerConfig, router: Router)->Result<JoinHandle<std::io::Result<()>>> {
    let sock_addr = config.sock_addr()?;
    let router_svc = router.into_make_service_with_connect_info::<SocketAddr>();

    if let Some(tls) = &config.tls {
        let cert_path = PathBuf::from( env_expand( &tls.cert_path)?);
        let key_path = PathBuf::from( env_expand( &tls.key_path)?);
        let tls_config = RustlsConfig::from_pem_file( cert_path, key_path).await?;

        info!("serving https on {}", sock_addr);
        Ok( tokio::spawn( async move {
            axum_server::bind_rustls( sock_addr, tls_config).serve( router_svc).await
        }))
    } else {
        let listener = tokio::net::TcpListener::bind( sock_addr).await?;

        info!("serving http on {}", listener.local_addr()?);
        Ok( tokio::spawn( async move {
            axum::serve( listener, router_svc).await
        }))
    }
}

//--- response layers

pub fn with_cors_headers (router: Router)->Router {
    CORS_HEADERS.iter().fold( router, |router, (name, value)| {
        router.layer( SetResponseHeaderLayer::overriding( name.clone(), HeaderValue::from_static(*value)))
    })
}

pub fn with_request_tracing (router: Router)->Router {
    router.layer( TraceLayer::new_for_http())
}

/// handler for CORS preflight (OPTIONS) requests. The headers are added by `with_cors_headers`
pub async fn preflight ()->StatusCode {
    StatusCode::OK
}

/// install a global fmt subscriber with a `RUST_LOG` env filter (defaults to "info").
/// Note this only succeeds if there is no global subscriber set yet
pub fn init_tracing () {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter( filter)
        .try_init();
}
