use std::{collections::BTreeMap, fmt};

use serde::{
    Deserialize, Deserializer,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};

/// Vendor type code of the main indoor unit.
pub const MAIN_MODULE_TYPE: &str = "NAMain";
/// Vendor type code of the outdoor module.
pub const OUTDOOR_MODULE_TYPE: &str = "NAModule1";
/// Vendor type code of an additional indoor module.
pub const INDOOR_MODULE_TYPE: &str = "NAModule4";

/// Dashboard keys listed in the "data" grouping of a module.
pub const MEASUREMENT_KEYS: &[&str] = &[
    "Temperature",
    "Humidity",
    "CO2",
    "Noise",
    "Pressure",
    "AbsolutePressure",
    "Rain",
    "sum_rain_1",
    "sum_rain_24",
    "WindAngle",
    "WindStrength",
    "GustAngle",
    "GustStrength",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleType {
    Main,
    Outdoor,
    Indoor,
    Unknown(String),
}

impl ModuleType {
    pub fn from_code(code: &str) -> Self {
        match code {
            MAIN_MODULE_TYPE => ModuleType::Main,
            OUTDOOR_MODULE_TYPE => ModuleType::Outdoor,
            INDOOR_MODULE_TYPE => ModuleType::Indoor,
            other => ModuleType::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ModuleType::Main => MAIN_MODULE_TYPE,
            ModuleType::Outdoor => OUTDOOR_MODULE_TYPE,
            ModuleType::Indoor => INDOOR_MODULE_TYPE,
            ModuleType::Unknown(code) => code,
        }
    }
}

impl<'de> Deserialize<'de> for ModuleType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(ModuleType::from_code(&code))
    }
}

/// A single reading as reported by the API.
///
/// Firmware versions disagree on how a metric is encoded, so the same logical
/// value may arrive as a string, a float or an integer. Anything else is kept
/// as `Unsupported` instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureValue {
    Text(String),
    F32(f32),
    F64(f64),
    I32(i32),
    I64(i64),
    Unsupported,
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Text(s) => f.write_str(s),
            MeasureValue::F32(v) => write!(f, "{v}"),
            MeasureValue::F64(v) => write!(f, "{v}"),
            MeasureValue::I32(v) => write!(f, "{v}"),
            MeasureValue::I64(v) => write!(f, "{v}"),
            MeasureValue::Unsupported => f.write_str("?"),
        }
    }
}

impl From<&str> for MeasureValue {
    fn from(value: &str) -> Self {
        MeasureValue::Text(value.to_string())
    }
}

impl From<f32> for MeasureValue {
    fn from(value: f32) -> Self {
        MeasureValue::F32(value)
    }
}

impl From<f64> for MeasureValue {
    fn from(value: f64) -> Self {
        MeasureValue::F64(value)
    }
}

impl From<i32> for MeasureValue {
    fn from(value: i32) -> Self {
        MeasureValue::I32(value)
    }
}

impl From<i64> for MeasureValue {
    fn from(value: i64) -> Self {
        MeasureValue::I64(value)
    }
}

struct MeasureValueVisitor;

impl<'de> Visitor<'de> for MeasureValueVisitor {
    type Value = MeasureValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a measurement value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MeasureValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(MeasureValue::Text(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(i32::try_from(v).map_or(MeasureValue::I64(v), MeasureValue::I32))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        match i64::try_from(v) {
            Ok(v) => self.visit_i64(v),
            Err(_) => Ok(MeasureValue::Unsupported),
        }
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<Self::Value, E> {
        Ok(MeasureValue::F32(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(MeasureValue::F64(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(MeasureValue::Unsupported)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MeasureValue::Unsupported)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MeasureValue::Unsupported)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(MeasureValue::Unsupported)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(MeasureValue::Unsupported)
    }
}

impl<'de> Deserialize<'de> for MeasureValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MeasureValueVisitor)
    }
}

/// Latest measurement set of a module.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardData {
    /// Unix timestamp of the measurement; `None` when nothing was reported yet.
    #[serde(rename = "time_utc")]
    pub last_measure: Option<i64>,

    #[serde(flatten)]
    pub values: BTreeMap<String, MeasureValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub module_type: ModuleType,
    pub dashboard: Option<DashboardData>,
    pub battery_percent: Option<i64>,
    pub rf_status: Option<i64>,
    pub wifi_status: Option<i64>,
    pub last_message: Option<i64>,
}

impl Module {
    pub fn new(name: impl Into<String>, module_type: ModuleType) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            module_type,
            dashboard: None,
            battery_percent: None,
            rf_status: None,
            wifi_status: None,
            last_message: None,
        }
    }

    /// Attach a measurement set taken at `time_utc`.
    pub fn with_measurements<K, V>(
        mut self,
        time_utc: i64,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<MeasureValue>,
    {
        self.dashboard = Some(DashboardData {
            last_measure: Some(time_utc),
            values: values.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        });
        self
    }

    /// Timestamp of the last measurement, if the module ever reported one.
    pub fn last_measure(&self) -> Option<i64> {
        self.dashboard.as_ref().and_then(|d| d.last_measure)
    }

    pub fn measurement(&self, key: &str) -> Option<&MeasureValue> {
        self.dashboard.as_ref().and_then(|d| d.values.get(key))
    }

    /// Radio/battery status readings and the time they were last refreshed.
    pub fn info(&self) -> (Option<i64>, BTreeMap<&'static str, MeasureValue>) {
        let mut info = BTreeMap::new();
        let fields = [
            ("BatteryPercent", self.battery_percent),
            ("RFStatus", self.rf_status),
            ("WifiStatus", self.wifi_status),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                info.insert(key, MeasureValue::I64(v));
            }
        }

        (self.last_message.or(self.last_measure()), info)
    }

    /// Weather readings listed for the module and the measurement timestamp.
    pub fn data(&self) -> (Option<i64>, BTreeMap<&'static str, &MeasureValue>) {
        let data = MEASUREMENT_KEYS
            .iter()
            .filter_map(|key| self.measurement(key).map(|v| (*key, v)))
            .collect();

        (self.last_measure(), data)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub modules: Vec<Module>,
}
