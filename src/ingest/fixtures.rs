//! Annotated AWDB response bodies used by unit tests.
//!
//! Trimmed from real responses; fields the tracker never reads are kept in a
//! few places so the parsers are exercised against the full shape.

/// `stations` response for the Salt Lake City query: three active SNOTEL
/// sites. Elevation is in feet.
pub fn fixture_slc_discovery_json() -> &'static str {
    r#"[
      {
        "stationTriplet": "1308:UT:SNTL",
        "stationId": "1308",
        "stateCode": "UT",
        "networkCode": "SNTL",
        "name": "Atwater",
        "countyName": "Salt Lake",
        "elevation": 8750,
        "latitude": 40.59124,
        "longitude": -111.63775
      },
      {
        "stationTriplet": "1214:UT:SNTL",
        "name": "Parrish Creek",
        "countyName": "Davis",
        "elevation": 7740
      },
      {
        "stationTriplet": "766:UT:SNTL",
        "name": "Snowbird",
        "countyName": "Salt Lake",
        "elevation": 9177.5
      }
    ]"#
}

/// `data` response for Atwater over 48 hours, trimmed to four hourly values.
/// Depth in inches: 60, 61, 59, 66.
pub fn fixture_atwater_data_json() -> &'static str {
    r#"[
      {
        "stationTriplet": "1308:UT:SNTL",
        "data": [
          {
            "stationElement": {
              "elementCode": "SNWD",
              "ordinal": 1,
              "heightDepth": null,
              "durationName": "HOURLY",
              "dataPrecision": 0,
              "storedUnitCode": "in"
            },
            "values": [
              { "date": "2025-01-13 08:00", "value": 60 },
              { "date": "2025-01-13 09:00", "value": 61 },
              { "date": "2025-01-13 10:00", "value": 59 },
              { "date": "2025-01-13 11:00", "value": 66 }
            ]
          }
        ]
      }
    ]"#
}

/// `data` response where the sensor missed an hour: the middle entry has a
/// date but no value.
pub fn fixture_data_with_gap_json() -> &'static str {
    r#"[
      {
        "stationTriplet": "1214:UT:SNTL",
        "data": [
          {
            "values": [
              { "date": "2025-01-13 08:00", "value": 40 },
              { "date": "2025-01-13 09:00" },
              { "date": "2025-01-13 10:00", "value": 43 }
            ]
          }
        ]
      }
    ]"#
}

/// `data` response with two element blocks. Only the first is used.
pub fn fixture_multi_block_data_json() -> &'static str {
    r#"[
      {
        "stationTriplet": "766:UT:SNTL",
        "data": [
          {
            "values": [
              { "date": "2025-01-13 08:00", "value": 10 },
              { "date": "2025-01-13 09:00", "value": 12 }
            ]
          },
          {
            "values": [
              { "date": "2025-01-13 08:00", "value": 99 }
            ]
          }
        ]
      },
      {
        "stationTriplet": "1308:UT:SNTL",
        "data": [ { "values": [ { "date": "2025-01-13 08:00", "value": 77 } ] } ]
      }
    ]"#
}
