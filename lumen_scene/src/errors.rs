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

use axum::http::StatusCode;
use thiserror::Error;
use lumen_common::LumenCommonError;

pub type Result<T> = std::result::Result<T, LumenSceneError>;

#[derive(Error,Debug)]
pub enum LumenSceneError {

    #[error("No GeoJSON provided")]
    MissingInput,

    #[error("Only Polygon Feature GeoJSON is supported")]
    UnsupportedGeometry,

    #[error("no scene found within {0}")]
    NoSceneFound(String),

    // message as reported by the imagery provider
    #[error("{0}")]
    ProviderError(String),

    #[error("{0}")]
    CommonError( #[from] LumenCommonError),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("http error: {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("operation failed: {0}")]
    OpFailedError(String),
}

impl LumenSceneError {
    /// input validation failures are client errors, everything else is on us (or our provider)
    pub fn status_code (&self)->StatusCode {
        match self {
            LumenSceneError::MissingInput | LumenSceneError::UnsupportedGeometry => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    pub fn is_client_error (&self)->bool {
        self.status_code().is_client_error()
    }
}

pub fn op_failed (msg: impl ToString)->LumenSceneError {
    LumenSceneError::OpFailedError(msg.to_string())
}

pub fn provider_error (msg: impl ToString)->LumenSceneError {
    LumenSceneError::ProviderError(msg.to_string())
}
