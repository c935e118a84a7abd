//! Property feature record and its request schema.
//!
//! A [`FeatureRecord`] only exists once every one of the 13 attributes has
//! been checked against [`SCHEMA`]; there are no defaults.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// The 13 attributes the request schema carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    TotalImages,
    Beds,
    Baths,
    Area,
    Latitude,
    Longitude,
    Garden,
    Garage,
    NewConstruction,
    Pool,
    Terrace,
    AirConditioning,
    Parking,
}

impl Feature {
    /// All features in schema declaration order
    pub const ALL: [Feature; 13] = [
        Feature::TotalImages,
        Feature::Beds,
        Feature::Baths,
        Feature::Area,
        Feature::Latitude,
        Feature::Longitude,
        Feature::Garden,
        Feature::Garage,
        Feature::NewConstruction,
        Feature::Pool,
        Feature::Terrace,
        Feature::AirConditioning,
        Feature::Parking,
    ];

    /// Wire name, as used in requests and model metadata
    pub fn name(self) -> &'static str {
        match self {
            Feature::TotalImages => "total_images",
            Feature::Beds => "beds",
            Feature::Baths => "baths",
            Feature::Area => "area",
            Feature::Latitude => "latitude",
            Feature::Longitude => "longitude",
            Feature::Garden => "garden",
            Feature::Garage => "garage",
            Feature::NewConstruction => "new_construction",
            Feature::Pool => "pool",
            Feature::Terrace => "terrace",
            Feature::AirConditioning => "air_conditioning",
            Feature::Parking => "parking",
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric kind of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
}

/// Lower bound of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lower {
    Inclusive(f64),
    Exclusive(f64),
}

/// Validation rule for one field; upper bounds are always inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub feature: Feature,
    pub kind: FieldKind,
    pub lower: Lower,
    pub upper: f64,
}

const fn int(feature: Feature, min: f64, max: f64) -> FieldSpec {
    FieldSpec {
        feature,
        kind: FieldKind::Integer,
        lower: Lower::Inclusive(min),
        upper: max,
    }
}

const fn flag(feature: Feature) -> FieldSpec {
    int(feature, 0.0, 1.0)
}

const fn decimal(feature: Feature, lower: Lower, max: f64) -> FieldSpec {
    FieldSpec {
        feature,
        kind: FieldKind::Decimal,
        lower,
        upper: max,
    }
}

/// Request schema, in declaration order
pub const SCHEMA: [FieldSpec; 13] = [
    int(Feature::TotalImages, 0.0, 50.0),
    int(Feature::Beds, 0.0, 10.0),
    decimal(Feature::Baths, Lower::Inclusive(0.0), 10.0),
    decimal(Feature::Area, Lower::Exclusive(0.0), 10000.0),
    decimal(Feature::Latitude, Lower::Inclusive(-90.0), 90.0),
    decimal(Feature::Longitude, Lower::Inclusive(-180.0), 180.0),
    flag(Feature::Garden),
    flag(Feature::Garage),
    flag(Feature::NewConstruction),
    flag(Feature::Pool),
    flag(Feature::Terrace),
    flag(Feature::AirConditioning),
    flag(Feature::Parking),
];

/// One rejected field, shaped like the usual `{loc, msg, type}` entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl FieldError {
    fn new(field: Option<&str>, msg: impl Into<String>, error_type: &str) -> Self {
        let mut loc = vec!["body".to_string()];
        if let Some(field) = field {
            loc.push(field.to_string());
        }
        Self {
            loc,
            msg: msg.into(),
            error_type: error_type.to_string(),
        }
    }

    /// Field name this error is about, if any
    pub fn field(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

/// Validated description of one property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub total_images: u32,
    pub beds: u32,
    pub baths: f64,
    pub area: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub garden: u8,
    pub garage: u8,
    pub new_construction: u8,
    pub pool: u8,
    pub terrace: u8,
    pub air_conditioning: u8,
    pub parking: u8,
}

impl FeatureRecord {
    /// Numeric value of a feature as fed to the model
    pub fn value(&self, feature: Feature) -> f32 {
        match feature {
            Feature::TotalImages => self.total_images as f32,
            Feature::Beds => self.beds as f32,
            Feature::Baths => self.baths as f32,
            Feature::Area => self.area as f32,
            Feature::Latitude => self.latitude as f32,
            Feature::Longitude => self.longitude as f32,
            Feature::Garden => self.garden as f32,
            Feature::Garage => self.garage as f32,
            Feature::NewConstruction => self.new_construction as f32,
            Feature::Pool => self.pool as f32,
            Feature::Terrace => self.terrace as f32,
            Feature::AirConditioning => self.air_conditioning as f32,
            Feature::Parking => self.parking as f32,
        }
    }

    /// Parse and validate a raw JSON body
    pub fn from_json_slice(body: &[u8]) -> Result<Self, Vec<FieldError>> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            vec![FieldError::new(
                None,
                format!("JSON decode error: {}", e),
                "value_error.jsondecode",
            )]
        })?;
        Self::from_json(&value)
    }

    /// Validate a JSON value against [`SCHEMA`], reporting every failed field
    pub fn from_json(value: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = value.as_object() else {
            return Err(vec![FieldError::new(
                None,
                "value is not a valid dict",
                "type_error.dict",
            )]);
        };

        let mut values = [0.0_f64; 13];
        let mut errors = Vec::new();
        for (slot, spec) in values.iter_mut().zip(SCHEMA.iter()) {
            match check_field(object, spec) {
                Ok(v) => *slot = v,
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let [total_images, beds, baths, area, latitude, longitude, garden, garage, new_construction, pool, terrace, air_conditioning, parking] =
            values;
        // Integer fields are integral and bounded at this point.
        Ok(Self {
            total_images: total_images as u32,
            beds: beds as u32,
            baths,
            area,
            latitude,
            longitude,
            garden: garden as u8,
            garage: garage as u8,
            new_construction: new_construction as u8,
            pool: pool as u8,
            terrace: terrace as u8,
            air_conditioning: air_conditioning as u8,
            parking: parking as u8,
        })
    }
}

fn check_field(object: &Map<String, Value>, spec: &FieldSpec) -> Result<f64, FieldError> {
    let name = spec.feature.name();
    let raw = match object.get(name) {
        None => return Err(FieldError::new(Some(name), "field required", "value_error.missing")),
        Some(Value::Null) => {
            return Err(FieldError::new(
                Some(name),
                "none is not an allowed value",
                "type_error.none.not_allowed",
            ))
        }
        Some(v) => v,
    };

    let number = match (spec.kind, raw.as_f64()) {
        (FieldKind::Integer, Some(n)) if n.fract() == 0.0 => n,
        (FieldKind::Integer, _) => {
            return Err(FieldError::new(
                Some(name),
                "value is not a valid integer",
                "type_error.integer",
            ))
        }
        (FieldKind::Decimal, Some(n)) if n.is_finite() => n,
        (FieldKind::Decimal, _) => {
            return Err(FieldError::new(
                Some(name),
                "value is not a valid float",
                "type_error.float",
            ))
        }
    };

    match spec.lower {
        Lower::Inclusive(min) if number < min => {
            return Err(FieldError::new(
                Some(name),
                format!("ensure this value is greater than or equal to {}", min),
                "value_error.number.not_ge",
            ))
        }
        Lower::Exclusive(min) if number <= min => {
            return Err(FieldError::new(
                Some(name),
                format!("ensure this value is greater than {}", min),
                "value_error.number.not_gt",
            ))
        }
        _ => {}
    }
    if number > spec.upper {
        return Err(FieldError::new(
            Some(name),
            format!("ensure this value is less than or equal to {}", spec.upper),
            "value_error.number.not_le",
        ));
    }

    Ok(number)
}
