//! 내장 시나리오 카탈로그
//!
//! 서비스가 문서화한 인자 조합을 쿼리 종류별로 묶었습니다.
//! 태그 의미:
//! - `smoke`: 빠르게 끝나는 최소 확인
//! - `core`: 인자별 동작 확인
//! - `json`: `format=json` 응답 경로
//! - `full-db`: 완전한 데이터셋이 있어야 의미 있는 시나리오 (기본 제외)

use omniprobe_core::types::{QueryKind, QueryOutput};

use crate::scenario::{FULL_DB_TAG, Scenario};
use crate::validate::Expectation;

const SMOKE: &str = "smoke";
const CORE: &str = "core";
const JSON: &str = "json";

fn columns(names: &[&str]) -> Expectation {
    Expectation::HasColumns {
        columns: names.iter().map(|c| (*c).to_owned()).collect(),
    }
}

fn values_in(column: &str, allowed: &[&str]) -> Expectation {
    Expectation::ValuesIn {
        column: column.to_owned(),
        allowed: allowed.iter().map(|v| (*v).to_owned()).collect(),
    }
}

fn all_equal(column: &str, value: &str) -> Expectation {
    Expectation::AllEqual {
        column: column.to_owned(),
        value: value.to_owned(),
    }
}

fn contains(column: &str, value: &str) -> Expectation {
    Expectation::ContainsValue {
        column: column.to_owned(),
        value: value.to_owned(),
    }
}

/// `column` 중 하나라도 `value`인 행이 있는지
fn any_row_mentions(output: &QueryOutput, columns: &[&str], value: &str) -> bool {
    columns.iter().any(|column| {
        output
            .column_values(column)
            .is_some_and(|values| values.iter().any(|v| v == value))
    })
}

/// 내장 시나리오 목록 (선언 순서가 곧 실행 순서)
pub fn builtin_scenarios() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    scenarios.extend(interactions());
    scenarios.extend(annotations());
    scenarios.extend(complexes());
    scenarios.extend(enzsub());
    scenarios.extend(intercell());
    scenarios.extend(metadata());
    scenarios
}

fn interactions() -> Vec<Scenario> {
    vec![
        Scenario::new("interactions_datasets", QueryKind::Interactions)
            .describe("collectri and omnipath datasets, comma-joined")
            .arg("datasets", "collectri,omnipath")
            .arg("genesymbols", true)
            .arg("limit", 10_i64)
            .tags([SMOKE, CORE])
            .expect(Expectation::NonEmpty)
            .expect(Expectation::MaxRows { max: 10 })
            .expect(columns(&["source", "target", "is_directed"])),
        Scenario::new("interactions_directed", QueryKind::Interactions)
            .describe("directed interactions only")
            .arg("directed", true)
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(values_in("is_directed", &["1", "True", "true"])),
        Scenario::new("interactions_signor_json", QueryKind::Interactions)
            .describe("SIGNOR interactions as JSON records")
            .arg("resources", vec!["SIGNOR"])
            .arg("format", "json")
            .arg("limit", 10_i64)
            .tags([CORE, JSON])
            .expect(Expectation::NonEmpty)
            .expect(contains("sources", "SIGNOR")),
        Scenario::new("interactions_partners_egfr", QueryKind::Interactions)
            .describe("interactions where EGFR is either partner")
            .arg("partners", "EGFR")
            .arg("genesymbols", true)
            .arg("limit", 50_i64)
            .tag(CORE)
            .check("egfr_involved", |output| {
                any_row_mentions(
                    output,
                    &["source", "target", "source_genesymbol", "target_genesymbol"],
                    "EGFR",
                )
            }),
        Scenario::new("interactions_dorothea_levels", QueryKind::Interactions)
            .describe("DoRothEA confidence levels A and B")
            .arg("datasets", "dorothea")
            .arg("dorothea_levels", "A,B")
            .arg("limit", 10_i64)
            .tag(CORE),
        Scenario::new("interactions_signed", QueryKind::Interactions)
            .describe("signed interactions only")
            .arg("signed", true)
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(Expectation::NonEmpty),
        Scenario::new("interactions_all", QueryKind::Interactions)
            .describe("complete default interaction network")
            .arg("genesymbols", true)
            .tags([FULL_DB_TAG, CORE])
            .expect(Expectation::MinRows { min: 1000 }),
    ]
}

fn annotations() -> Vec<Scenario> {
    vec![
        Scenario::new("annotations_fst", QueryKind::Annotations)
            .describe("annotations of a single protein")
            .arg("proteins", "FST")
            .arg("limit", 10_i64)
            .tag(SMOKE)
            .expect(columns(&["uniprot", "genesymbol", "source", "label", "value"])),
        Scenario::new("annotations_two_proteins", QueryKind::Annotations)
            .describe("annotations of FST and TGFB1")
            .arg("proteins", vec!["FST", "TGFB1"])
            .tag(CORE)
            .expect(values_in("genesymbol", &["FST", "TGFB1"]))
            .expect(contains("genesymbol", "TGFB1")),
        Scenario::new("annotations_resources", QueryKind::Annotations)
            .describe("annotations restricted to two resources")
            .arg("resources", "UniProt_tissue,KEGG")
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(values_in("source", &["UniProt_tissue", "KEGG"])),
        Scenario::new("annotations_complexes", QueryKind::Annotations)
            .describe("annotations of complexes only")
            .arg("entity_types", "complex")
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(all_equal("entity_type", "complex")),
    ]
}

fn complexes() -> Vec<Scenario> {
    vec![
        Scenario::new("complexes_json", QueryKind::Complexes)
            .describe("first complexes as JSON records")
            .arg("format", "json")
            .arg("limit", 10_i64)
            .tags([SMOKE, JSON])
            .expect(Expectation::NonEmpty)
            .expect(columns(&["name", "components", "sources"])),
        Scenario::new("complexes_all", QueryKind::Complexes)
            .describe("complete complex table")
            .tag(FULL_DB_TAG)
            .expect(Expectation::MinRows { min: 100 }),
    ]
}

fn enzsub() -> Vec<Scenario> {
    vec![
        Scenario::new("enzsub_basic", QueryKind::Enzsub)
            .describe("one enzyme, one substrate")
            .arg("enzymes", "P06239")
            .arg("substrates", "O14543")
            .arg("limit", 10_i64)
            .tag(SMOKE)
            .expect(columns(&[
                "enzyme",
                "substrate",
                "residue_type",
                "residue_offset",
                "modification",
            ])),
        Scenario::new("enzsub_two_enzymes", QueryKind::Enzsub)
            .describe("two enzymes, any substrate")
            .arg("enzymes", vec!["P06241", "P12931"])
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(values_in("enzyme", &["P06241", "P12931"])),
        Scenario::new("enzsub_enzyme_and_substrate", QueryKind::Enzsub)
            .describe("enzyme AND substrate instead of the default OR")
            .arg("enzymes", "P06241")
            .arg("substrates", "O14543")
            .arg("enzyme_substrate", "AND")
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(all_equal("enzyme", "P06241"))
            .expect(all_equal("substrate", "O14543")),
        Scenario::new("enzsub_phosphorylation", QueryKind::Enzsub)
            .describe("phosphorylation sites only")
            .arg("types", "phosphorylation")
            .arg("limit", 20_i64)
            .tag(CORE)
            .expect(all_equal("modification", "phosphorylation")),
        Scenario::new("enzsub_residues", QueryKind::Enzsub)
            .describe("tyrosine and threonine residues")
            .arg("residues", "Y,T")
            .arg("limit", 20_i64)
            .tag(CORE)
            .expect(values_in("residue_type", &["Y", "T"])),
        Scenario::new("enzsub_mouse", QueryKind::Enzsub)
            .describe("mouse enzyme-substrate relationships")
            .arg("organisms", 10090_i64)
            .arg("limit", 10_i64)
            .tags([FULL_DB_TAG, CORE])
            .expect(Expectation::NonEmpty),
    ]
}

fn intercell() -> Vec<Scenario> {
    vec![
        Scenario::new("intercell_cellphonedb", QueryKind::Intercell)
            .describe("intercell roles from CellPhoneDB")
            .arg("resources", "CellPhoneDB")
            .arg("limit", 10_i64)
            .tag(SMOKE)
            .expect(all_equal("database", "CellPhoneDB")),
        Scenario::new("intercell_receptors", QueryKind::Intercell)
            .describe("receptor category")
            .arg("categories", "receptor")
            .arg("limit", 20_i64)
            .tag(CORE)
            .expect(all_equal("category", "receptor")),
        Scenario::new("intercell_transmitters", QueryKind::Intercell)
            .describe("transmitters that are not receivers")
            .arg("transmitter", true)
            .arg("receiver", false)
            .arg("limit", 20_i64)
            .tag(CORE),
        Scenario::new("intercell_generic_functional", QueryKind::Intercell)
            .describe("generic scope, functional aspect")
            .arg("scope", "generic")
            .arg("aspect", "functional")
            .arg("limit", 10_i64)
            .tag(CORE)
            .expect(all_equal("scope", "generic"))
            .expect(all_equal("aspect", "functional")),
        Scenario::new("intercell_transmembrane", QueryKind::Intercell)
            .describe("plasma membrane transmembrane proteins (pmtm shorthand)")
            .arg("pmtm", true)
            .arg("limit", 10_i64)
            .tag(CORE),
    ]
}

fn metadata() -> Vec<Scenario> {
    vec![
        Scenario::new("resources_json", QueryKind::Resources)
            .describe("resource catalogue as a JSON document")
            .arg("format", "json")
            .tags([SMOKE, JSON])
            .expect(Expectation::NonEmpty),
        Scenario::new("annotations_summary", QueryKind::AnnotationsSummary)
            .describe("annotation resources and labels")
            .tag(CORE)
            .expect(Expectation::NonEmpty),
        Scenario::new("intercell_summary", QueryKind::IntercellSummary)
            .describe("intercell categories overview")
            .tag(CORE)
            .expect(Expectation::NonEmpty),
        Scenario::new("queries_overview", QueryKind::Queries)
            .describe("list of query types the service accepts")
            .tag(SMOKE),
    ]
}
