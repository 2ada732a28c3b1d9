use plotgrid::core::{
    AxisKind, DataSeries, DomainTuning, PlotArea, PlotMargins, Scale, SeriesId, SeriesPoint,
    Viewport, ZoomTransform, value_extent,
};

fn series_of(n: usize) -> DataSeries {
    DataSeries::new(
        (0..n)
            .map(|i| SeriesPoint::new(i as f64, (i as f64).sin() * 50.0, SeriesId::new(0)))
            .collect(),
    )
}

#[test]
fn fitted_scale_covers_every_data_point() {
    let series = series_of(10_000);
    let plot = PlotArea::from_viewport(Viewport::new(800, 600), PlotMargins::default());

    let x = Scale::fitted(
        AxisKind::Numeric,
        series.x_extent().expect("x extent"),
        DomainTuning::default(),
        plot.left,
        plot.right(),
    )
    .expect("x scale");
    let y = Scale::fitted(
        AxisKind::Numeric,
        series.y_extent().expect("y extent"),
        DomainTuning::default(),
        plot.bottom(),
        plot.top,
    )
    .expect("y scale");

    for point in series.points() {
        let px = x.to_pixel(point.x).expect("x pixel");
        let py = y.to_pixel(point.y).expect("y pixel");
        assert!(px >= plot.left && px <= plot.right());
        assert!(py >= plot.top && py <= plot.bottom());
    }
}

#[test]
fn single_point_series_produces_usable_scales() {
    let series = DataSeries::new(vec![SeriesPoint::new(5.0, 3.0, SeriesId::new(0))]);

    let x = Scale::fitted(
        AxisKind::Numeric,
        series.x_extent().expect("x extent"),
        DomainTuning::default(),
        0.0,
        800.0,
    )
    .expect("x scale");

    let (start, end) = x.domain();
    assert!(end > start);
    let px = x.to_pixel(5.0).expect("pixel");
    assert!(px.is_finite());
    let recovered = x.from_pixel(px).expect("inverse");
    assert!((recovered - 5.0).abs() <= 1e-6);
}

#[test]
fn empty_series_yields_default_domain_without_error() {
    let series = DataSeries::default();
    let extent = series.x_extent().expect("extent");
    assert!(extent.is_none());

    let scale = Scale::fitted(AxisKind::Numeric, extent, DomainTuning::default(), 0.0, 800.0)
        .expect("default scale");
    assert!(scale.domain_span() > 0.0);
}

#[test]
fn zoomed_rescale_round_trips_through_pixels() {
    let base = Scale::new(AxisKind::Numeric, 0.0, 1_000.0, 0.0, 800.0).expect("base");
    let transform = ZoomTransform::uniform(4.0, -900.0, 0.0);
    let current = transform.rescale_x(base).expect("rescale");

    for value in [300.0, 400.0, 500.0] {
        let px = current.to_pixel(value).expect("pixel");
        let recovered = current.from_pixel(px).expect("inverse");
        assert!((recovered - value).abs() <= 1e-9);
    }

    // Zooming in by 4x narrows the visible domain by 4x.
    assert!((current.domain_span() - 250.0).abs() <= 1e-9);
}

#[test]
fn extent_propagates_invalid_samples_as_errors() {
    assert!(value_extent([0.0, f64::INFINITY].into_iter()).is_err());
    assert!(value_extent([f64::NAN].into_iter()).is_err());
    assert!(value_extent(std::iter::empty()).expect("empty").is_none());
}
