//! Export of enriched segment records.

use crate::error::{AppError, AppResult};
use crate::run_service::SegmentRecord;

pub const CSV_HEADER: &str = "id,branch,order,start_node,end_node,start_connection,\
nominal_diameter_mm,reference_diameter_mm,reference_diameter_inches,real_length_m,\
elevation_drop_m,fixture_unit_weight,equivalent_length_m,min_pressure_kpa,\
flow_lps,velocity_mps,gradient_kpa_per_m,p_in_kpa,hf_cont_kpa,hf_loc_kpa,\
p_disp_kpa,p_out_kpa,p_out_mwc,margin_kpa";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

pub fn export(records: &[SegmentRecord], format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Csv => Ok(export_csv(records)),
        ExportFormat::Json => export_json(records),
        ExportFormat::Yaml => export_yaml(records),
    }
}

/// CSV table with [`CSV_HEADER`]; computed columns are empty for
/// unreachable segments.
pub fn export_csv(records: &[SegmentRecord]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for r in records {
        let mut fields = vec![
            escape(&r.id),
            escape(&r.branch),
            r.order.to_string(),
            escape(&r.start_node),
            escape(&r.end_node),
            escape(&r.start_connection),
            r.nominal_diameter_mm.to_string(),
            r.reference_diameter_mm.to_string(),
            escape(&r.reference_diameter_inches),
            r.real_length_m.to_string(),
            r.elevation_drop_m.to_string(),
            r.fixture_unit_weight.to_string(),
            format!("{:.3}", r.equivalent_length_m),
            r.min_pressure_kpa.to_string(),
        ];
        match &r.hydraulics {
            Some(h) => fields.extend(
                [
                    h.flow_lps,
                    h.velocity_mps,
                    h.gradient_kpa_per_m,
                    h.p_in_kpa,
                    h.hf_cont_kpa,
                    h.hf_loc_kpa,
                    h.p_disp_kpa,
                    h.p_out_kpa,
                    h.p_out_mwc,
                    h.margin_kpa,
                ]
                .iter()
                .map(|v| format!("{:.4}", v)),
            ),
            None => fields.extend(std::iter::repeat_n(String::new(), 10)),
        }
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    csv
}

pub fn export_json(records: &[SegmentRecord]) -> AppResult<String> {
    serde_json::to_string_pretty(records).map_err(|e| AppError::Export(e.to_string()))
}

pub fn export_yaml(records: &[SegmentRecord]) -> AppResult<String> {
    serde_yaml::to_string(records).map_err(|e| AppError::Export(e.to_string()))
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_service::RecordHydraulics;

    fn record(id: &str, reached: bool) -> SegmentRecord {
        SegmentRecord {
            id: id.to_string(),
            branch: "A".to_string(),
            order: 1,
            start_node: "A".to_string(),
            end_node: "B".to_string(),
            start_connection: "entry".to_string(),
            nominal_diameter_mm: 25.0,
            reference_diameter_mm: 25.0,
            reference_diameter_inches: "3/4\"".to_string(),
            real_length_m: 3.0,
            elevation_drop_m: 1.0,
            fixture_unit_weight: 1.0,
            equivalent_length_m: 1.2,
            min_pressure_kpa: 10.0,
            hydraulics: reached.then(|| RecordHydraulics {
                flow_lps: 0.3,
                velocity_mps: 0.61,
                gradient_kpa_per_m: 0.2,
                p_in_kpa: 100.0,
                hf_cont_kpa: 0.6,
                hf_loc_kpa: 0.24,
                p_disp_kpa: 9.80665,
                p_out_kpa: 108.96665,
                p_out_mwc: 11.11,
                margin_kpa: 98.96665,
            }),
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let csv = export_csv(&[record("t1", true), record("t2", false)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        let columns = CSV_HEADER.split(',').count();
        assert!(lines[1].starts_with("t1,A,1,A,B,entry,"));
        assert!(lines[2].ends_with(",,,,,,,,,"));
        assert!(lines[1].contains("\"3/4\"\"\""));
        assert_eq!(lines[2].matches(',').count(), columns - 1);
    }

    #[test]
    fn json_flattens_hydraulics() {
        let json = export_json(&[record("t1", true), record("t2", false)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["p_in_kpa"], 100.0);
        assert!(value[1].get("p_in_kpa").is_none());
        assert_eq!(value[1]["id"], "t2");
    }

    #[test]
    fn yaml_lists_every_record() {
        let yaml = export_yaml(&[record("t1", true)]).unwrap();
        assert!(yaml.contains("id: t1"));
        assert!(yaml.contains("margin_kpa:"));
    }
}
