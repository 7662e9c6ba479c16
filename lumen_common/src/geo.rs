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

//! conversion between GeoJSON geometry objects and geo-types polygons

use geo_types::{Coord, Polygon};
use geojson::Geometry;
use serde_json::Value;

use crate::errors::{invalid_geometry, Result};

/// a closed ring needs at least 3 distinct positions plus the closing one
pub const MIN_RING_POSITIONS: usize = 4;

/// parse a GeoJSON geometry object (e.g. `{"type":"Polygon","coordinates":[[[lon,lat],..]]}`) into a
/// `Polygon`. Rings are closed if they aren't already
pub fn polygon_from_geometry_value (value: &Value)->Result<Polygon<f64>> {
    let geometry = Geometry::from_json_value( value.clone())?;
    let polygon: Polygon<f64> = Polygon::try_from( geometry)?;

    let n = polygon.exterior().0.len();
    if n < MIN_RING_POSITIONS {
        return Err( invalid_geometry( format!("polygon exterior ring has {} positions (min {})", n, MIN_RING_POSITIONS)))
    }

    Ok(polygon)
}

/// the rings of a polygon as nested `[lon,lat]` arrays, exterior ring first
pub fn polygon_coordinates (polygon: &Polygon<f64>)->Vec<Vec<[f64;2]>> {
    let ring = |coords: &Vec<Coord<f64>>| coords.iter().map( |c| [c.x, c.y]).collect::<Vec<_>>();

    let mut rings = Vec::with_capacity( 1 + polygon.interiors().len());
    rings.push( ring( &polygon.exterior().0));
    for interior in polygon.interiors() {
        rings.push( ring( &interior.0));
    }
    rings
}

/// number of positions over all rings (useful for logging)
pub fn position_count (polygon: &Polygon<f64>)->usize {
    polygon.exterior().0.len() + polygon.interiors().iter().map( |r| r.0.len()).sum::<usize>()
}
