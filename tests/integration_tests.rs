use sales_charts::chart::{Chart, ChartData, ChartKind, ChartScales, Phase};
use sales_charts::config::{ChartConfig, DashboardConfig};
use sales_charts::error::{ChartError, LoadError};
use sales_charts::loader::{CsvLoader, Loader};
use sales_charts::records::CategoryYear;
use sales_charts::render::JsonRenderer;

fn fixture() -> String {
    format!(
        "{}/tests/fixtures/superstore_sample.csv",
        env!("CARGO_MANIFEST_DIR")
    )
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[tokio::test]
async fn test_load_fixture() {
    let rows = CsvLoader::new()
        .load(&fixture())
        .await
        .expect("Failed to load fixture");

    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].category.as_deref(), Some("Furniture"));
    assert_eq!(rows[1].profit, Some(219.582));
    assert_eq!(rows[3].order_date.as_deref(), Some("11/10/2015"));
}

#[tokio::test]
async fn test_bar_totals_from_fixture() {
    let chart = Chart::new(ChartKind::Bar, ChartConfig::bar());
    chart.load(&CsvLoader::new(), &fixture()).await.unwrap();

    let data = chart.data().unwrap();
    let ChartData::Bar(summary) = &*data else {
        panic!("expected bar data");
    };
    let keys: Vec<_> = summary.keys().cloned().collect();
    assert_eq!(keys, vec!["Furniture", "Office Supplies", "Technology"]);
    assert!(approx(summary.get(&"Furniture".to_string()).unwrap(), -121.5354));
    assert!(approx(summary.get(&"Office Supplies".to_string()).unwrap(), 147.4232));
    assert!(approx(summary.get(&"Technology".to_string()).unwrap(), 35.214));

    let ChartScales::Bar { x, y } = chart.compute_scales().unwrap() else {
        panic!("expected bar scales");
    };
    assert_eq!(x.domain().len(), 3);
    assert!(approx(y.min(), -121.5354));
    assert!(approx(y.max(), 147.4232));
}

#[tokio::test]
async fn test_heatmap_cells_from_fixture() {
    let chart = Chart::new(ChartKind::Heatmap, ChartConfig::heatmap());
    chart.load(&CsvLoader::new(), &fixture()).await.unwrap();

    let data = chart.data().unwrap();
    let ChartData::Heatmap(summary) = &*data else {
        panic!("expected heatmap data");
    };
    assert_eq!(summary.len(), 7);
    assert_eq!(summary.get(&CategoryYear::new("Technology", 2014)), Some(10.0));
    assert_eq!(summary.get(&CategoryYear::new("Office Supplies", 2016)), Some(5.0));
    assert_eq!(summary.get(&CategoryYear::new("Furniture", 2017)), None);
    assert_eq!(summary.total(), 35.0);

    let ChartScales::Heatmap { y, fill, legend, .. } = chart.compute_scales().unwrap() else {
        panic!("expected heatmap scales");
    };
    assert_eq!(y.domain(), &[2014, 2015, 2016, 2017]);
    assert_eq!(fill.domain(), [0.0, 10.0]);
    assert_eq!(legend.len(), 5);
}

#[tokio::test]
async fn test_scatter_sample_cap() {
    let config = ChartConfig {
        sample_cap: 3,
        ..ChartConfig::scatter()
    };
    let chart = Chart::new(ChartKind::Scatter, config);
    chart.load(&CsvLoader::new(), &fixture()).await.unwrap();

    let data = chart.data().unwrap();
    let ChartData::Scatter(sample) = &*data else {
        panic!("expected scatter data");
    };
    assert_eq!(sample.len(), 3);
    assert_eq!(sample.points()[0].sales, 261.96);

    let ChartScales::Scatter { x, category, .. } = chart.compute_scales().unwrap() else {
        panic!("expected scatter scales");
    };
    assert!(x.min() <= 14.62 && x.max() >= 731.94);
    assert_eq!(category.domain(), &["Furniture", "Office Supplies"]);
}

#[tokio::test]
async fn test_render_dashboard_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = JsonRenderer::new(dir.path());
    let loader = CsvLoader::new();
    let dashboard = DashboardConfig::default();

    for (kind, config) in [
        (ChartKind::Bar, dashboard.bar.clone()),
        (ChartKind::Scatter, dashboard.scatter.clone()),
        (ChartKind::Heatmap, dashboard.heatmap.clone()),
    ] {
        let chart = Chart::new(kind, config);
        chart.refresh(&loader, &fixture(), &renderer).await.unwrap();
        assert_eq!(chart.phase(), Phase::Rendered);
    }

    for name in ["barChart.json", "disper.json", "heatmap.json"] {
        let content = std::fs::read_to_string(dir.path().join(name)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(json["marks"]["items"].as_array().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn test_failing_pipeline_does_not_affect_others() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_dates.csv");
    std::fs::write(
        &path,
        "Category,Sales,Quantity,Discount,Profit\nFurniture,10,1,0,2\nTechnology,20,2,0.1,-4\n",
    )
    .unwrap();
    let source = path.to_string_lossy().to_string();
    let renderer = JsonRenderer::new(dir.path().join("out"));
    let loader = CsvLoader::new();

    let bar = Chart::new(ChartKind::Bar, ChartConfig::bar());
    let heatmap = Chart::new(ChartKind::Heatmap, ChartConfig::heatmap());

    let (bar_result, heatmap_result) = tokio::join!(
        bar.refresh(&loader, &source, &renderer),
        heatmap.refresh(&loader, &source, &renderer),
    );

    assert!(bar_result.is_ok());
    assert_eq!(bar.phase(), Phase::Rendered);
    assert!(matches!(
        heatmap_result,
        Err(ChartError::Load(LoadError::MissingField {
            field: "Order Date",
            ..
        }))
    ));
    assert_eq!(heatmap.phase(), Phase::Empty);
    assert!(dir.path().join("out/barChart.json").exists());
    assert!(!dir.path().join("out/heatmap.json").exists());
}

#[tokio::test]
async fn test_missing_file() {
    let chart = Chart::new(ChartKind::Bar, ChartConfig::bar());
    let err = chart
        .load(&CsvLoader::new(), "no/such/sales.csv")
        .await
        .unwrap_err();

    assert!(matches!(err, ChartError::Load(LoadError::FileNotFound(_))));
    assert_eq!(chart.phase(), Phase::Empty);
}

#[tokio::test]
async fn test_malformed_date_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad_date.csv");
    std::fs::write(
        &path,
        "Category,Order Date,Quantity\nFurniture,8/11/2016,2\nFurniture,November,3\n",
    )
    .unwrap();

    let chart = Chart::new(ChartKind::Heatmap, ChartConfig::heatmap());
    let err = chart
        .load(&CsvLoader::new(), &path.to_string_lossy())
        .await
        .unwrap_err();

    assert!(matches!(err, ChartError::MalformedDate(_)));
}
