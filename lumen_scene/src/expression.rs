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

//! builders for Earth Engine computation graphs as used by the v1 REST API.
//! An expression is a set of value nodes with a designated result node. We always create a single
//! (nested) result node "0" - the server does not require shared sub-expressions to be factored out.
//! See https://developers.google.com/earth-engine/reference/rest/v1/Expression

use geo_types::Polygon;
use serde_json::{json, Map, Value};
use lumen_common::{datetime::TimeWindow, geo::polygon_coordinates};

pub const TIME_START_PROPERTY: &str = "system:time_start";

pub fn expression (root: Value)->Value {
    json!({ "result": "0", "values": { "0": root } })
}

pub fn constant (v: impl Into<Value>)->Value {
    json!({ "constantValue": v.into() })
}

pub fn invoke (function_name: &str, args: Vec<(&str,Value)>)->Value {
    let arguments: Map<String,Value> = args.into_iter().map( |(k,v)| (k.to_string(), v)).collect();
    json!({ "functionInvocationValue": { "functionName": function_name, "arguments": arguments } })
}

//--- geometry

pub fn polygon (polygon: &Polygon<f64>)->Value {
    invoke( "GeometryConstructors.Polygon", vec![
        ("coordinates", constant( json!( polygon_coordinates( polygon)))),
        ("evenOdd", constant( true)),
    ])
}

//--- collections

pub fn load_image_collection (id: &str)->Value {
    invoke( "ImageCollection.load", vec![ ("id", constant(id)) ])
}

/// scenes acquired within [start,end) of the window, at day granularity
pub fn filter_date (collection: Value, window: &TimeWindow)->Value {
    let date_range = invoke( "DateRange", vec![
        ("start", invoke( "Date", vec![ ("value", constant( window.start_date())) ])),
        ("end", invoke( "Date", vec![ ("value", constant( window.end_date())) ])),
    ]);
    let filter = invoke( "Filter.dateRangeContains", vec![
        ("leftValue", date_range),
        ("rightField", constant( TIME_START_PROPERTY)),
    ]);
    invoke( "Collection.filter", vec![ ("collection", collection), ("filter", filter) ])
}

/// scenes whose footprint intersects `geometry`
pub fn filter_bounds (collection: Value, geometry: Value)->Value {
    let filter = invoke( "Filter.intersects", vec![
        ("leftField", constant(".all")),
        ("rightValue", geometry),
    ]);
    invoke( "Collection.filter", vec![ ("collection", collection), ("filter", filter) ])
}

pub fn sort_ascending (collection: Value, key: &str)->Value {
    invoke( "Collection.limit", vec![
        ("collection", collection),
        ("key", constant(key)),
        ("ascending", constant(true)),
    ])
}

pub fn first (collection: Value)->Value {
    invoke( "Collection.first", vec![ ("collection", collection) ])
}

pub fn size (collection: Value)->Value {
    invoke( "Collection.size", vec![ ("collection", collection) ])
}

//--- images

pub fn clip (image: Value, geometry: Value)->Value {
    invoke( "Image.clip", vec![ ("input", image), ("geometry", geometry) ])
}

/// clip to the bounding box of `geometry` and scale so that the long edge has `max_dimension` pixels
pub fn clip_to_bounds_and_scale (image: Value, geometry: Value, max_dimension: u32)->Value {
    invoke( "Image.clipToBoundsAndScale", vec![
        ("input", image),
        ("geometry", geometry),
        ("maxDimension", constant( max_dimension)),
    ])
}

pub fn visualize (image: Value, bands: &[String], min: f64, max: f64)->Value {
    invoke( "Image.visualize", vec![
        ("image", image),
        ("bands", constant( json!(bands))),
        ("min", constant(min)),
        ("max", constant(max)),
    ])
}
