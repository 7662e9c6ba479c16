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

//! RON based configuration loading. Config files are looked up in `$LUMEN_CONFIG_DIR` and then in
//! `./configs`. String values that hold secrets (tokens, project ids) should reference environment
//! variables as `${NAME}` and get expanded with [`env_expand`] at the point of use

use std::{env, path::{Path,PathBuf}};
use serde::Deserialize;
use regex::{Captures, Regex};
use lazy_static::lazy_static;

use crate::errors::{LumenCommonError, Result};

pub const CONFIG_DIR_ENV: &str = "LUMEN_CONFIG_DIR";
pub const CONFIGS: &str = "configs";

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new( r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// load a RON config from the given file
pub fn load_config<C,P> (path: P)->Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = std::fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// look up a config file by name, first in `$LUMEN_CONFIG_DIR` and then in `./configs`
pub fn find_config_file (filename: &str)->Option<PathBuf> {
    let dirs = env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from).into_iter()
        .chain( std::iter::once( PathBuf::from(CONFIGS)));

    for dir in dirs {
        let path = dir.join( filename);
        if path.is_file() { return Some(path) }
    }
    None
}

/// replace all `${NAME}` references in `s` with the values of respective environment variables.
/// Fails if any of the referenced variables is not set
pub fn env_expand (s: &str)->Result<String> {
    env_expand_with( s, |name| env::var(name).ok())
}

/// same as [`env_expand`] but with explicit variable lookup
pub fn env_expand_with<F> (s: &str, lookup: F)->Result<String> where F: Fn(&str)->Option<String> {
    let mut missing: Option<String> = None;

    let expanded = ENV_VAR_RE.replace_all( s, |caps: &Captures| {
        let name = &caps[1];
        match lookup(name) {
            Some(value) => value,
            None => {
                if missing.is_none() { missing = Some(name.to_string()) }
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err( LumenCommonError::MissingEnvVar(name)),
        None => Ok( expanded.into_owned())
    }
}
