use crate::errors::{ConfigError, ConfigResult};
use schema::{PokemonType, TypeChartTable};
use std::str::FromStr;
use strum::{EnumCount, IntoEnumIterator};

const NUM_TYPES: usize = PokemonType::COUNT;

/// Immutable attacking-type x defending-type multiplier matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChart {
    matrix: [[f64; NUM_TYPES]; NUM_TYPES],
}

impl TypeChart {
    /// Validate a raw table and build the chart.
    ///
    /// The header must name every type of the universe in matrix order, the body
    /// must be square, and every entry must be a finite, non-negative multiplier.
    pub fn from_table(table: &TypeChartTable) -> ConfigResult<Self> {
        if table.types.len() != NUM_TYPES {
            return Err(ConfigError::ChartDimensions {
                expected: NUM_TYPES,
                rows: table.rows.len(),
                columns: table.types.len(),
            });
        }
        for (position, (name, expected)) in table.types.iter().zip(PokemonType::iter()).enumerate() {
            let parsed = parse_type(name)?;
            if parsed != expected {
                return Err(ConfigError::ChartHeader {
                    position,
                    expected: expected.to_string(),
                    found: name.clone(),
                });
            }
        }
        Self::from_rows(&table.rows)
    }

    /// Build a chart from bare rows already in matrix order.
    pub fn from_rows(rows: &[Vec<f64>]) -> ConfigResult<Self> {
        let mut matrix = [[1.0; NUM_TYPES]; NUM_TYPES];

        if rows.len() != NUM_TYPES {
            return Err(ConfigError::ChartDimensions {
                expected: NUM_TYPES,
                rows: rows.len(),
                columns: rows.first().map_or(0, Vec::len),
            });
        }
        for (attacking, row) in rows.iter().enumerate() {
            if row.len() != NUM_TYPES {
                return Err(ConfigError::ChartDimensions {
                    expected: NUM_TYPES,
                    rows: rows.len(),
                    columns: row.len(),
                });
            }
            for (defending, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::ChartEntry {
                        attacking,
                        defending,
                        value,
                    });
                }
                matrix[attacking][defending] = value;
            }
        }

        Ok(Self { matrix })
    }

    /// A chart where every matchup is neutral.
    pub fn neutral() -> Self {
        Self {
            matrix: [[1.0; NUM_TYPES]; NUM_TYPES],
        }
    }

    /// Multiplier for a single attacking/defending pair.
    pub fn lookup(&self, attacking: PokemonType, defending: PokemonType) -> f64 {
        self.matrix[attacking.index()][defending.index()]
    }

    /// Name-keyed lookup; unknown names are configuration errors.
    pub fn lookup_by_name(&self, attacking: &str, defending: &str) -> ConfigResult<f64> {
        Ok(self.lookup(parse_type(attacking)?, parse_type(defending)?))
    }

    /// Combined multiplier against a defender with one or two types.
    pub fn effective_multiplier(
        &self,
        attacking: PokemonType,
        primary: PokemonType,
        secondary: Option<PokemonType>,
    ) -> f64 {
        let first = self.lookup(attacking, primary);
        match secondary {
            Some(second) => first * self.lookup(attacking, second),
            None => first,
        }
    }

    /// Return a copy with one matchup overridden. Used to stage fixtures.
    pub fn with_entry(mut self, attacking: PokemonType, defending: PokemonType, value: f64) -> Self {
        self.matrix[attacking.index()][defending.index()] = value;
        self
    }
}

/// Parse a type name from one of the startup tables.
pub fn parse_type(name: &str) -> ConfigResult<PokemonType> {
    PokemonType::from_str(name.trim()).map_err(|_| ConfigError::UnknownType(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::PokemonType::*;

    fn sample_chart() -> TypeChart {
        TypeChart::neutral()
            .with_entry(Fire, Grass, 2.0)
            .with_entry(Fire, Water, 0.5)
            .with_entry(Fire, Rock, 0.5)
            .with_entry(Electric, Water, 2.0)
            .with_entry(Electric, Flying, 2.0)
            .with_entry(Electric, Ground, 0.0)
    }

    #[test]
    fn test_from_rows_rejects_wrong_shape() {
        let rows = vec![vec![1.0; 18]; 17];
        assert!(matches!(
            TypeChart::from_rows(&rows),
            Err(ConfigError::ChartDimensions { rows: 17, .. })
        ));

        let mut rows = vec![vec![1.0; 18]; 18];
        rows[4] = vec![1.0; 3];
        assert!(matches!(
            TypeChart::from_rows(&rows),
            Err(ConfigError::ChartDimensions { columns: 3, .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_negative_or_nan_entries() {
        let mut rows = vec![vec![1.0; 18]; 18];
        rows[2][5] = -0.5;
        assert!(matches!(
            TypeChart::from_rows(&rows),
            Err(ConfigError::ChartEntry {
                attacking: 2,
                defending: 5,
                ..
            })
        ));

        rows[2][5] = f64::NAN;
        assert!(TypeChart::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_table_checks_header_order() {
        let mut types: Vec<String> = PokemonType::iter().map(|t| t.to_string()).collect();
        let table = TypeChartTable {
            types: types.clone(),
            rows: vec![vec![1.0; 18]; 18],
        };
        assert!(TypeChart::from_table(&table).is_ok());

        types.swap(0, 1);
        let swapped = TypeChartTable {
            types,
            rows: vec![vec![1.0; 18]; 18],
        };
        assert!(matches!(
            TypeChart::from_table(&swapped),
            Err(ConfigError::ChartHeader { position: 0, .. })
        ));
    }

    #[test]
    fn test_lookup_by_name_reports_unknown_types() {
        let chart = sample_chart();
        assert_eq!(chart.lookup_by_name("Fire", "grass"), Ok(2.0));
        assert_eq!(
            chart.lookup_by_name("Fire", "Plasma"),
            Err(ConfigError::UnknownType("Plasma".to_string()))
        );
    }

    #[rstest]
    #[case(Fire, Grass, None, 2.0)]
    #[case(Fire, Water, Some(Rock), 0.25)]
    #[case(Electric, Water, Some(Flying), 4.0)]
    #[case(Electric, Water, Some(Ground), 0.0)]
    #[case(Normal, Psychic, Some(Ghost), 1.0)]
    fn test_effective_multiplier_is_product_of_lookups(
        #[case] attacking: PokemonType,
        #[case] primary: PokemonType,
        #[case] secondary: Option<PokemonType>,
        #[case] expected: f64,
    ) {
        let chart = sample_chart();
        let combined = chart.effective_multiplier(attacking, primary, secondary);
        let manual = match secondary {
            Some(second) => chart.lookup(attacking, primary) * chart.lookup(attacking, second),
            None => chart.lookup(attacking, primary),
        };
        assert_eq!(combined, manual);
        assert_eq!(combined, expected);
    }
}
