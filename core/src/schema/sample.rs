use serde::{Deserialize, Serialize};

/// Expected type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Integer,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn float(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Float,
    }
}

/// Column layout after header cleaning, in declaration order.
pub const FIELDS: [FieldSpec; 13] = [
    float("FixedAcidity"),
    float("VolatileAcidity"),
    float("CitricAcid"),
    float("ResidualSugar"),
    float("Chlorides"),
    float("FreeSulfurDioxide"),
    float("TotalSulfurDioxide"),
    float("Density"),
    float("PH"),
    float("Sulphates"),
    float("Alcohol"),
    FieldSpec {
        name: "Quality",
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "Color",
        kind: FieldKind::Text,
    },
];

pub const FIELD_NAMES: [&str; 13] = [
    "FixedAcidity",
    "VolatileAcidity",
    "CitricAcid",
    "ResidualSugar",
    "Chlorides",
    "FreeSulfurDioxide",
    "TotalSulfurDioxide",
    "Density",
    "PH",
    "Sulphates",
    "Alcohol",
    "Quality",
    "Color",
];

/// One fully typed input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WineSample {
    pub fixed_acidity: f64,
    pub volatile_acidity: f64,
    pub citric_acid: f64,
    pub residual_sugar: f64,
    pub chlorides: f64,
    pub free_sulfur_dioxide: f64,
    pub total_sulfur_dioxide: f64,
    pub density: f64,
    #[serde(rename = "PH")]
    pub ph: f64,
    pub sulphates: f64,
    pub alcohol: f64,
    pub quality: i64,
    /// Usually "red" or "white"; not enforced.
    pub color: String,
}

/// A single model input cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl WineSample {
    /// Look a field up by its schema name.
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        use FeatureValue::Number;
        let value = match name {
            "FixedAcidity" => Number(self.fixed_acidity),
            "VolatileAcidity" => Number(self.volatile_acidity),
            "CitricAcid" => Number(self.citric_acid),
            "ResidualSugar" => Number(self.residual_sugar),
            "Chlorides" => Number(self.chlorides),
            "FreeSulfurDioxide" => Number(self.free_sulfur_dioxide),
            "TotalSulfurDioxide" => Number(self.total_sulfur_dioxide),
            "Density" => Number(self.density),
            "PH" => Number(self.ph),
            "Sulphates" => Number(self.sulphates),
            "Alcohol" => Number(self.alcohol),
            "Quality" => Number(self.quality as f64),
            "Color" => FeatureValue::Category(self.color.clone()),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_specs() {
        let names: Vec<&str> = FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, FIELD_NAMES.to_vec());
    }

    #[test]
    fn test_serde_names_match_schema() {
        let sample = WineSample {
            fixed_acidity: 7.4,
            volatile_acidity: 0.7,
            citric_acid: 0.0,
            residual_sugar: 1.9,
            chlorides: 0.076,
            free_sulfur_dioxide: 11.0,
            total_sulfur_dioxide: 34.0,
            density: 0.9978,
            ph: 3.51,
            sulphates: 0.56,
            alcohol: 9.4,
            quality: 5,
            color: "red".to_string(),
        };
        let value = serde_json::to_value(&sample).unwrap();
        let obj = value.as_object().unwrap();
        for name in FIELD_NAMES {
            assert!(obj.contains_key(name), "missing {name}");
            assert!(sample.feature(name).is_some());
        }
        assert_eq!(sample.feature("Quality"), Some(FeatureValue::Number(5.0)));
        assert_eq!(sample.feature("Sweetness"), None);
    }
}
