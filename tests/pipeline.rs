use std::path::Path;

use iondose::data::loader::{load_augmented, load_table};
use iondose::data::model::Column;
use iondose::plot::{PlotConfig, make_plots_from_file};
use iondose::{ErrorKind, convert_file, evaluate_spr};

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn converts_csv_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "e10.csv", "depth,ion\n1,10\n50,100\n200,5\n");

    let out = convert_file(&input, 5.0).unwrap();
    assert_eq!(out, dir.path().join("e10_withdose.csv"));

    let text = std::fs::read_to_string(&out).unwrap();
    let spr = (evaluate_spr(5.0, 5.0).unwrap() * 1000.0).round() / 1000.0;
    assert_eq!(text, format!("depth,ion,spr,dose\n50.0,100.0,{spr},100.0\n"));
}

#[test]
fn output_keeps_input_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "scan.json",
        r#"[{"depth": 5, "ion": 0.9}, {"depth": 15, "ion": 1.0}, {"depth": 30, "ion": 0.5}]"#,
    );
    let out = convert_file(&input, 3.0).unwrap();
    assert_eq!(out.extension().unwrap(), "json");

    let table = load_augmented(&out).unwrap();
    assert_eq!(table.column(Column::Depth), vec![5.0, 15.0, 30.0]);
    assert_eq!(table.column(Column::Ion), vec![90.0, 100.0, 50.0]);
}

#[test]
fn error_kinds_are_distinguishable() {
    let dir = tempfile::tempdir().unwrap();

    let garbage = write(dir.path(), "garbage.csv", "not,a,table\n\"unterminated\n");
    let err = convert_file(&garbage, 5.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("garbage.csv"));

    let zeros = write(dir.path(), "zeros.csv", "depth,ion\n10,0\n20,0\n");
    let err = convert_file(&zeros, 5.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);

    let fine = write(dir.path(), "fine.csv", "depth,ion\n10,1\n20,2\n");
    let err = convert_file(&fine, 0.5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert!(!dir.path().join("fine_withdose.csv").exists());
}

#[test]
fn converted_file_plots() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = String::from("depth,ion\n");
    for z in 0..=70 {
        let z = f64::from(z);
        let ion = 1.0 / (1.0 + ((z - 45.0) / 3.0).exp()) + 0.02;
        csv.push_str(&format!("{z},{ion}\n"));
    }
    let input = write(dir.path(), "e9.csv", &csv);
    assert_eq!(load_table(&input).unwrap().len(), 71);

    let out = convert_file(&input, 4.5).unwrap();
    let config = PlotConfig {
        dpi: 24,
        ..Default::default()
    };
    let pngs = make_plots_from_file(&out, 9.0, &config).unwrap();
    assert_eq!(pngs.len(), 3);
    assert!(pngs.iter().all(|p| p.exists()));
    assert!(pngs[0].ends_with("e9_withdose_PDD.png"));
}
