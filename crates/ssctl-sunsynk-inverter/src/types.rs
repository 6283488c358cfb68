// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed view of the realtime grid payload.
//!
//! The server mixes numeric and string encodings (`fac` is a number,
//! `etodayFrom` a decimal string). Fields are kept as sent; missing fields
//! default rather than fail.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridRealtimeResponse {
	pub code: i64,
	#[serde(rename = "msg")]
	pub message: String,
	pub data: GridRealtimeData,
	pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridRealtimeData {
	/// kWh imported today.
	pub etoday_from: String,
	/// kWh exported today.
	pub etoday_to: String,
	pub etotal_from: String,
	pub etotal_to: String,
	/// Grid frequency, Hz.
	pub fac: f64,
	pub limiter_total_power: i64,
	/// Active power, W. Negative when exporting.
	pub pac: i64,
	pub pf: f64,
	/// Reactive power, var.
	pub qac: i64,
	pub status: i64,
	pub vip: Vec<PhaseReading>,
}

/// One phase: voltage, current, power.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseReading {
	pub volt: String,
	pub current: String,
	pub power: i64,
}

impl GridRealtimeResponse {
	pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"code": 0,
		"msg": "Success",
		"data": {
			"vip": [
				{"volt": "238.4", "current": "3.1", "power": 712},
				{"volt": "0.0", "current": "0.0", "power": 0}
			],
			"pac": -712,
			"qac": 12,
			"fac": 50.02,
			"pf": 0.99,
			"status": 1,
			"acRealyStatus": 1,
			"etodayFrom": "1.4",
			"etodayTo": "9.8",
			"etotalFrom": "1203.7",
			"etotalTo": "4410.2",
			"limiterTotalPower": 0
		},
		"success": true
	}"#;

	#[test]
	fn parses_realtime_sample() {
		let response = GridRealtimeResponse::from_json(SAMPLE).unwrap();
		assert!(response.success);
		assert_eq!(response.message, "Success");
		assert_eq!(response.data.pac, -712);
		assert_eq!(response.data.etoday_to, "9.8");
		assert_eq!(response.data.vip.len(), 2);
		assert_eq!(response.data.vip[0].volt, "238.4");
		assert!((response.data.fac - 50.02).abs() < f64::EPSILON);
	}

	#[test]
	fn missing_fields_default() {
		let response = GridRealtimeResponse::from_json(r#"{"code":0,"msg":"Success"}"#).unwrap();
		assert_eq!(response.data, GridRealtimeData::default());
		assert!(!response.success);
	}

	#[test]
	fn serializes_with_wire_names() {
		let response = GridRealtimeResponse::from_json(SAMPLE).unwrap();
		let json = serde_json::to_value(&response).unwrap();
		assert_eq!(json["msg"], "Success");
		assert_eq!(json["data"]["etodayFrom"], "1.4");
		assert_eq!(json["data"]["limiterTotalPower"], 0);
	}
}
