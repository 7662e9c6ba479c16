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

use std::fmt;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize,Deserialize};

/// the date format used for calendar-day query parameters (e.g. "2025-04-04")
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

pub fn date_string (dt: &DateTime<Utc>)->String {
    dt.format(DATE_FORMAT).to_string()
}

/// a closed-open time interval [start,end) that is used to restrict catalog queries
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// the window of `n_days` full days that ends at `end`
    pub fn trailing_days (end: DateTime<Utc>, n_days: u32)->Self {
        let start = end - TimeDelta::days( n_days as i64);
        TimeWindow { start, end }
    }

    /// the window of `n_days` that ends now. This is re-computed on each call
    pub fn last_days (n_days: u32)->Self {
        Self::trailing_days( utc_now(), n_days)
    }

    pub fn duration (&self)->TimeDelta {
        self.end - self.start
    }

    pub fn contains (&self, dt: &DateTime<Utc>)->bool {
        *dt >= self.start && *dt < self.end
    }

    pub fn start_date (&self)->String { date_string( &self.start) }
    pub fn end_date (&self)->String { date_string( &self.end) }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date(), self.end_date())
    }
}
