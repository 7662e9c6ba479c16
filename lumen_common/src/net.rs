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

//! common utility functions for REST/JSON network operations

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{LumenCommonError, Result};

/// POST `data` as JSON and deserialize the JSON response. Non-success responses are turned into
/// `HttpStatusError`s that carry the server provided error message (see [`error_message`])
pub async fn post_json<T,U> (client: &Client, url: &str, data: &T)->Result<U> where T: Serialize + ?Sized, U: DeserializeOwned {
    send_json( client.post( url).json( data)).await
}

/// send a prepared request (e.g. with per-request auth headers) and deserialize the JSON response
pub async fn send_json<U> (request: RequestBuilder)->Result<U> where U: DeserializeOwned {
    let response = request.send().await?;
    check_status( response).await
}

async fn check_status<U> (response: Response)->Result<U> where U: DeserializeOwned {
    let status = response.status();
    if status.is_success() {
        from_json( response).await
    } else {
        let msg = error_message( response).await;
        Err( LumenCommonError::HttpStatusError( status.as_u16(), msg))
    }
}

pub async fn from_json<T> (response: Response)->Result<T> where T: DeserializeOwned {
    let bytes = response.bytes().await?;
    Ok( serde_json::from_slice( &bytes)? )
}

/// extract a human readable error message from a failed response. This understands the
/// `{"error": {"message": ..}}` format of Google APIs and otherwise falls back to the body text
pub async fn error_message (response: Response)->String {
    let status = response.status();
    match response.text().await {
        Ok(text) => error_message_from_body( status.as_u16(), &text),
        Err(_) => format!("response status {}", status)
    }
}

pub fn error_message_from_body (status: u16, body: &str)->String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = v.pointer("/error/message").and_then( |m| m.as_str()) {
            return msg.to_string()
        }
        if let Some(msg) = v.get("error").and_then( |m| m.as_str()) {
            return msg.to_string()
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("response status {}", status)
    } else {
        body.to_string()
    }
}
