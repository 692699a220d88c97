use std::{collections::BTreeMap, fs::File, io, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Output locale for display labels and numeric formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Brazilian Portuguese.
    PtBr,
}

/// Error for an unrecognized locale code.
///
/// Locale selection happens at process start; this error is surfaced there,
/// never mid-computation.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("unknown locale '{code}', expected 'en' or 'br'")]
pub struct LocaleParseError {
    pub code: String,
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "en" => Ok(Locale::En),
            "br" => Ok(Locale::PtBr),
            _ => Err(LocaleParseError {
                code: code.to_owned(),
            }),
        }
    }
}

/// Label namespaces within a [`LabelCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum LabelKind {
    #[display("entity")]
    Entity,
    #[display("algorithm")]
    Algorithm,
    #[display("scenario")]
    Scenario,
    #[display("metric")]
    Metric,
    #[display("title")]
    Title,
}

/// Error for a display-string lookup with no catalog entry.
///
/// Fatal to the single rendering call that needed the label, not to the
/// whole batch; callers iterate over known keys.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("no {kind} label for key '{key}'")]
pub struct UnknownLabelError {
    pub kind: LabelKind,
    pub key: String,
}

/// Display-string configuration for one locale.
///
/// One injected catalog replaces the per-script label dictionaries the study
/// used to copy around. Built-ins exist for both study locales; a JSON file
/// can override them entirely.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LabelCatalog {
    /// Entity id → display name.
    pub entities: BTreeMap<String, String>,
    /// Algorithm id → display name.
    pub algorithms: BTreeMap<String, String>,
    /// Scenario key → display name.
    pub scenarios: BTreeMap<String, String>,
    /// Metric key → axis label.
    pub metrics: BTreeMap<String, String>,
    /// Figure kind → title template with a `{}` scenario placeholder.
    pub titles: BTreeMap<String, String>,
    /// Algorithm ids in presentation order.
    pub algorithm_order: Vec<String>,
}

impl LabelCatalog {
    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened, or a JSON error
    /// wrapped in `io::Error` when it cannot be parsed.
    pub fn from_path<P>(path: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        let reader = io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(io::Error::from)
    }

    /// Display name of an entity.
    pub fn entity(&self, key: &str) -> Result<&str, UnknownLabelError> {
        lookup(LabelKind::Entity, &self.entities, key)
    }

    /// Display name of an algorithm.
    pub fn algorithm(&self, key: &str) -> Result<&str, UnknownLabelError> {
        lookup(LabelKind::Algorithm, &self.algorithms, key)
    }

    /// Display name of a scenario.
    pub fn scenario(&self, key: &str) -> Result<&str, UnknownLabelError> {
        lookup(LabelKind::Scenario, &self.scenarios, key)
    }

    /// Axis label of a metric.
    pub fn metric(&self, key: &str) -> Result<&str, UnknownLabelError> {
        lookup(LabelKind::Metric, &self.metrics, key)
    }

    /// Figure title: the template of `figure` with the scenario display name
    /// filled into its `{}` placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use preemptviz_report::labels::{LabelCatalog, Locale};
    ///
    /// let catalog = LabelCatalog::builtin(Locale::En);
    /// let title = catalog.title("route", "turin").unwrap();
    /// assert_eq!(title, "Routes - Turin SUMO Traffic (TuST) Scenario");
    /// ```
    pub fn title(&self, figure: &str, scenario: &str) -> Result<String, UnknownLabelError> {
        let template = lookup(LabelKind::Title, &self.titles, figure)?;
        let scenario_name = self.scenario(scenario)?;
        Ok(template.replacen("{}", scenario_name, 1))
    }

    /// Display name of a map trace: numeric vehicle ids pass through
    /// verbatim, everything else resolves through the entity table.
    pub fn map_entity(&self, key: &str) -> Result<String, UnknownLabelError> {
        if key.parse::<i64>().is_ok() {
            return Ok(key.to_owned());
        }
        self.entity(key).map(str::to_owned)
    }

    /// Algorithms of `available`, restricted and ordered by the catalog's
    /// presentation order.
    #[must_use]
    pub fn ordered_algorithms<'a>(&'a self, available: &[String]) -> Vec<&'a str> {
        self.algorithm_order
            .iter()
            .filter(|alg| available.iter().any(|a| a == *alg))
            .map(String::as_str)
            .collect()
    }

    /// The built-in catalog of the study's label data for `locale`.
    #[must_use]
    pub fn builtin(locale: Locale) -> Self {
        match locale {
            Locale::En => builtin_en(),
            Locale::PtBr => builtin_pt_br(),
        }
    }
}

fn lookup<'a>(
    kind: LabelKind,
    map: &'a BTreeMap<String, String>,
    key: &str,
) -> Result<&'a str, UnknownLabelError> {
    map.get(key)
        .map(String::as_str)
        .ok_or_else(|| UnknownLabelError {
            kind,
            key: key.to_owned(),
        })
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|&(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

/// Algorithm presentation order shared by both locales.
fn algorithm_order() -> Vec<String> {
    [
        "rfid",
        "fuzzy",
        "kapusta2",
        "kapustaimp",
        "tpn4",
        "tpn6",
        "tpnx",
        "allgreen",
        "no-preemption",
    ]
    .iter()
    .map(|&alg| alg.to_owned())
    .collect()
}

fn builtin_en() -> LabelCatalog {
    LabelCatalog {
        entities: string_map(&[
            ("vehev1", "EV1"),
            ("vehev2", "EV2"),
            ("vehev3", "EV3"),
            ("vehev4", "EV1-Synthetic"),
            ("vehev5", "EV2-Synthetic"),
            ("vehev6", "EV3-Synthetic"),
            ("vehev7", "EV4"),
            ("veh11651", "EV"),
            ("veh4856", "EV"),
            ("boundary", "Experiment Area"),
            ("expcenter", "Expanded Center"),
        ]),
        algorithms: string_map(&[
            ("kapusta2", "Queue based"),
            ("kapustaimp", "Queue based (Imp.)"),
            ("allgreen", "All Green"),
            ("tpn4", "TPN"),
            ("tpn6", "TPN6"),
            ("tpnx", "TPN"),
            ("fuzzy", "Fuzzy"),
            ("rfid", "RFId"),
            ("no-preemption", "No Preemption"),
        ]),
        scenarios: string_map(&[
            ("turin", "Turin SUMO Traffic (TuST) Scenario"),
            ("cologne", "TAPAS Cologne"),
            ("metro-od-2017", "Metro OD 2017 (Exp. Center of SP)"),
            ("metro-od-2017-zones", "Zones - Metro OD 2017"),
            ("synth-sp", "Synthetic SP - First Experiment"),
            ("synth-ny", "Synthetic NY - First Experiment"),
            ("synth-sp-new", "Synthetic SP - Second Experiment"),
            ("synth-ny-new", "Synthetic NY - Second Experiment"),
            ("oneintersection", "One Intersection"),
            ("turinkap", "Turin"),
            ("colognekap", "Cologne"),
            ("sumohighteleporttime", "High Teleport Time"),
        ]),
        metrics: string_map(&[
            ("imp", "Time-Loss Improvement (times)"),
            ("perc", "Time-Loss Improvement (%)"),
            ("tl", "Time-Loss (s)"),
            ("rt", "Runtime (s)"),
            ("tl-ttt", "Time-Loss/Actual Travel Time (%)"),
            ("preemptime", "Mean Preemption Time (s)"),
            ("n_teleported", "Teleported Vehicles"),
            ("avg_trip_speed_perc", "Average Trip Speed (%)"),
            ("avg_trip_timeloss_perc", "Average Timeloss (%)"),
            ("teleported_perc", "Teleported Vehicles (%)"),
            ("n_vehicles", "Number of Vehicles"),
        ]),
        titles: string_map(&[
            ("route", "Routes - {}"),
            ("tl-imp", "Time-Loss Improvement - {}"),
            ("tl-perc", "Time-Loss Improvement - {}"),
            ("tl-no-preemption", "Time-Loss - No Preemption - {}"),
            ("tl-algs", "Time-Loss - Solutions - {}"),
            ("runtime", "Runtime - Solutions - {}"),
            ("tl-ttt", "Timeloss over Total Travel Time - {}"),
            ("preemptime", "Mean Preemption Time - {}"),
            ("n_teleported", "Number of teleported vehicles - {}"),
            ("avg_trip_speed_perc", "Average Trip Speed - All Vehicles - {}"),
            ("avg_trip_timeloss_perc", "Average Timeloss - All Vehicles - {}"),
            ("teleported_perc", "Teleported Vehicles - {}"),
        ]),
        algorithm_order: algorithm_order(),
    }
}

fn builtin_pt_br() -> LabelCatalog {
    LabelCatalog {
        entities: string_map(&[
            ("vehev1", "VE1"),
            ("vehev2", "VE2"),
            ("vehev3", "VE3"),
            ("vehev4", "VE1-Sintético"),
            ("vehev5", "VE2-Sintético"),
            ("vehev6", "VE3-Sintético"),
            ("vehev7", "VE4"),
            ("veh11651", "VE"),
            ("veh4856", "VE"),
            ("boundary", "Área do Experimento"),
            ("expcenter", "Centro Expandido"),
        ]),
        algorithms: string_map(&[
            ("kapusta2", "Filas"),
            ("kapustaimp", "Choque de Onda"),
            ("allgreen", "Tudo Verde"),
            ("tpn4", "TPN"),
            ("tpn6", "TPN6"),
            ("tpnx", "Choque de Onda + TPN*"),
            ("fuzzy", "Fuzzy"),
            ("rfid", "RFID"),
            ("no-preemption", "Sem Preempção"),
        ]),
        scenarios: string_map(&[
            ("turin", "Turim"),
            ("cologne", "Colônia"),
            ("metro-od-2017", "Centro Expandido - Metro OD SP 2017"),
            ("metro-od-2017-zones", "Zones - Metro OD 2017"),
            ("synth-sp", "São Paulo - Sintético"),
            ("synth-ny", "Nova York - Sintético"),
            ("synth-sp-new", "São Paulo - Segundo Experimento"),
            ("synth-ny-new", "Nova York - Segundo Experimento"),
            ("oneintersection", "Uma Interseção"),
            ("turinkap", "Turim"),
            ("colognekap", "Colônia"),
            ("sumohighteleporttime", "Alto Tempo de Teletransporte"),
        ]),
        metrics: string_map(&[
            ("imp", "Melhoria do Tempo Perdido (vezes)"),
            ("perc", "Melhoria do Tempo Perdido (%)"),
            ("tl", "Tempo Perdido (s)"),
            ("rt", "Tempo de Execução (s)"),
            ("tl-ttt", "Tempo Perdido/Tempo Total de Viagem (%)"),
            ("preemptime", "Tempo de Preempção Médio (s)"),
            ("n_teleported", "Veículos Teletransportados"),
            ("avg_trip_speed_perc", "Velocidade Média (%)"),
            ("avg_trip_timeloss_perc", "Tempo Perdido Médio (%)"),
            ("teleported_perc", "Veículos Teletransportados (%)"),
            ("n_vehicles", "Número de Veículos"),
        ]),
        titles: string_map(&[
            ("route", "Rotas - Cenário {}"),
            ("tl-imp", "Melhoria do Tempo Perdido - Cenário {}"),
            ("tl-perc", "Melhoria do Tempo Perdido - Cenário {}"),
            ("tl-no-preemption", "Tempo Perdido - Sem Preempção - Cenário {}"),
            ("tl-algs", "Tempo Perdido - Soluções - Cenário {}"),
            ("runtime", "Tempo de Execução - Soluções - Cenário {}"),
            (
                "tl-ttt",
                "Tempo Perdido sobre Tempo Total de Viagem - Cenário {}",
            ),
            ("preemptime", "Tempo de Preempção Médio - Cenário {}"),
            (
                "n_teleported",
                "N° de veículos teletransportados - Cenário {}",
            ),
            (
                "avg_trip_speed_perc",
                "Velocidade Média das Viagens - Todos os veículos - Cenário {}",
            ),
            (
                "avg_trip_timeloss_perc",
                "Tempo Perdido Médio - Todos os veículos - Cenário {}",
            ),
            ("teleported_perc", "Veículos Teletransportados - {}"),
        ]),
        algorithm_order: algorithm_order(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_codes_parse_or_fail_loudly() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("br".parse::<Locale>().unwrap(), Locale::PtBr);
        let err = "de".parse::<Locale>().unwrap_err();
        assert_eq!(err.code, "de");
    }

    #[test]
    fn unknown_keys_carry_kind_and_key() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let err = catalog.entity("vehev99").unwrap_err();
        assert_eq!(err.kind, LabelKind::Entity);
        assert_eq!(err.key, "vehev99");
        assert_eq!(err.to_string(), "no entity label for key 'vehev99'");
    }

    #[test]
    fn titles_fill_in_the_scenario_name() {
        let catalog = LabelCatalog::builtin(Locale::PtBr);
        let title = catalog.title("route", "cologne").unwrap();
        assert_eq!(title, "Rotas - Cenário Colônia");
    }

    #[test]
    fn numeric_map_entities_bypass_the_catalog() {
        let catalog = LabelCatalog::builtin(Locale::En);
        assert_eq!(catalog.map_entity("11651").unwrap(), "11651");
        assert_eq!(catalog.map_entity("vehev1").unwrap(), "EV1");
        assert!(catalog.map_entity("unknown-ev").is_err());
    }

    #[test]
    fn ordered_algorithms_follow_the_catalog_order() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let available = vec![
            "allgreen".to_owned(),
            "rfid".to_owned(),
            "unlisted".to_owned(),
        ];
        assert_eq!(
            catalog.ordered_algorithms(&available),
            vec!["rfid", "allgreen"]
        );
    }

    #[test]
    fn catalogs_round_trip_through_json() {
        let catalog = LabelCatalog::builtin(Locale::En);
        let json = serde_json::to_string(&catalog).unwrap();
        let reloaded: LabelCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.entity("vehev1").unwrap(), "EV1");
        assert_eq!(reloaded.algorithm_order, catalog.algorithm_order);
    }
}
