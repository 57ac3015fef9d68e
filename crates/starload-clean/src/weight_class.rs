use serde::Serialize;

/// Shipping band of a product, derived from its weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeightClass {
    Light,
    #[serde(rename = "Mid_Sized")]
    MidSized,
    Heavy,
    #[serde(rename = "Truck_Required")]
    TruckRequired,
}

/// Upper bound (exclusive) of each band, in ascending order. The last band
/// is open-ended.
pub const WEIGHT_BANDS: &[(WeightClass, Option<f64>)] = &[
    (WeightClass::Light, Some(2.0)),
    (WeightClass::MidSized, Some(40.0)),
    (WeightClass::Heavy, Some(140.0)),
    (WeightClass::TruckRequired, None),
];

impl WeightClass {
    pub fn label(&self) -> &'static str {
        match self {
            WeightClass::Light => "Light",
            WeightClass::MidSized => "Mid_Sized",
            WeightClass::Heavy => "Heavy",
            WeightClass::TruckRequired => "Truck_Required",
        }
    }
}

/// SQL `CASE` expression mapping `column` to its weight-class label.
///
/// Generated from [`WEIGHT_BANDS`]. Null weights stay null.
pub fn weight_class_case_sql(column: &str) -> String {
    let mut sql = String::from("CASE");
    for (class, upper) in WEIGHT_BANDS {
        match upper {
            Some(upper) => {
                sql.push_str(&format!(" WHEN {column} < {upper:?} THEN '{}'", class.label()))
            }
            None => sql.push_str(&format!(" WHEN {column} IS NOT NULL THEN '{}'", class.label())),
        }
    }
    sql.push_str(" END");
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band_of(weight: f64) -> WeightClass {
        WEIGHT_BANDS
            .iter()
            .find(|(_, upper)| upper.is_none_or(|upper| weight < upper))
            .map(|(class, _)| *class)
            .expect("last band is open-ended")
    }

    #[test]
    fn bands_are_half_open() {
        assert_eq!(band_of(1.99), WeightClass::Light);
        assert_eq!(band_of(2.0), WeightClass::MidSized);
        assert_eq!(band_of(39.99), WeightClass::MidSized);
        assert_eq!(band_of(40.0), WeightClass::Heavy);
        assert_eq!(band_of(140.0), WeightClass::TruckRequired);
        assert_eq!(band_of(0.0), WeightClass::Light);
    }

    #[test]
    fn case_expression_follows_bands() {
        assert_eq!(
            weight_class_case_sql("\"weight\""),
            "CASE WHEN \"weight\" < 2.0 THEN 'Light' \
             WHEN \"weight\" < 40.0 THEN 'Mid_Sized' \
             WHEN \"weight\" < 140.0 THEN 'Heavy' \
             WHEN \"weight\" IS NOT NULL THEN 'Truck_Required' END"
        );
    }
}
