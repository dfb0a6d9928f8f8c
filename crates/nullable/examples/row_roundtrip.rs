// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! This example moves a record from a database row to JSON and back, showing how null
//! and zero values survive each boundary.

use chrono::DateTime;
use nullable::driver::{Scan, ToValue, Value};
use nullable::{null, zero};

fn main() -> Result<(), nullable::Error> {
    // Column values as a driver would deliver them.
    let row = [
        Value::Text("Ada".to_owned()),
        Value::Int(0),
        Value::Null,
        Value::from(DateTime::from_timestamp(1_356_124_881, 0)),
    ];

    let [name, logins, deleted, created] = row;

    let mut name_field = null::Text::default();
    let mut logins_field = null::Int::default();
    let mut deleted_field = null::Timestamp::default();
    let mut created_field = null::Timestamp::default();

    name_field.scan(name)?;
    logins_field.scan(logins)?;
    deleted_field.scan(deleted)?;
    created_field.scan(created)?;

    // The null family keeps a valid zero apart from null.
    println!("name    -> {}", String::from_utf8_lossy(&name_field.marshal_json()));
    println!("logins  -> {}", String::from_utf8_lossy(&logins_field.marshal_json()));
    println!("deleted -> {}", String::from_utf8_lossy(&deleted_field.marshal_json()));
    println!("created -> {}", String::from_utf8_lossy(&created_field.marshal_json()));

    // The zero family folds zero into null, so a zero count is bound back as NULL.
    let logins_zero = zero::Int::from(logins_field);
    println!("logins as zero::Int -> {} / {:?}", logins_zero, logins_zero.to_value());

    // Decoding from JSON restores the instant in UTC.
    let mut decoded = null::Timestamp::default();
    decoded.unmarshal_json(&created_field.marshal_json())?;
    println!("decoded created at {} (equal: {})", decoded.time, decoded == created_field);

    // Foreign input is rejected and the field is left null.
    if let Err(error) = decoded.unmarshal_json(br#"{"Time":1356124881,"Valid":true}"#) {
        println!("rejected: {error}");
    }
    println!("after rejection the field is null: {}", decoded.is_zero());

    Ok(())
}
