use super::*;
use crate::foundation::core::Vec2;
use approx::assert_relative_eq;

fn op(
    translate: (f64, f64),
    rotate: f64,
    scale: (f64, f64),
    center: (f64, f64),
) -> GeometryOperator {
    GeometryOperator {
        translate: Vec2::new(translate.0, translate.1),
        rotate,
        scale: Vec2::new(scale.0, scale.1),
        center: Vec2::new(center.0, center.1),
    }
}

const HD: Size = Size {
    width: 1920,
    height: 1080,
};

#[test]
fn empty_chain_is_identity() {
    let m = compose_chain(&[], HD, ChainOptions::none());
    assert_eq!(m, AffineMatrix::IDENTITY);

    // Mirrors on both sides cancel out as well.
    let m = compose_chain(&[], HD, ChainOptions::default());
    assert!(m.approx_eq(&AffineMatrix::IDENTITY, 1e-9));
}

#[test]
fn opposite_translations_cancel() {
    let ops = [
        op((5.0, 0.0), 0.0, (1.0, 1.0), (960.0, 540.0)),
        op((-5.0, 0.0), 0.0, (1.0, 1.0), (960.0, 540.0)),
    ];
    let m = compose_chain(&ops, HD, ChainOptions::none());
    assert!(m.approx_eq(&AffineMatrix::IDENTITY, 1e-9));
}

#[test]
fn operator_order_is_translate_center_scale_rotate() {
    let o = op((10.0, 20.0), 90.0, (2.0, 3.0), (100.0, 50.0));
    let m = AffineMatrix::from(o.to_affine());
    // Point at the pivot plus (1, 0): rotated to (0, 1), scaled to (0, 3),
    // moved back to the pivot and translated.
    let p = m.project(Point::new(101.0, 50.0));
    assert_relative_eq!(p.x, 110.0, epsilon = 1e-9);
    assert_relative_eq!(p.y, 73.0, epsilon = 1e-9);
}

#[test]
fn chain_is_reversed_by_default() {
    let a = op((10.0, 0.0), 0.0, (1.0, 1.0), (0.0, 0.0));
    let b = op((0.0, 0.0), 0.0, (2.0, 2.0), (0.0, 0.0));

    let reversed = compose_chain(&[a, b], HD, ChainOptions::none());
    let expected = AffineMatrix::from(b.to_affine() * a.to_affine());
    assert!(reversed.approx_eq(&expected, 1e-12));

    let authored = compose_chain(
        &[a, b],
        HD,
        ChainOptions {
            reverse_chain: false,
            ..ChainOptions::none()
        },
    );
    let expected = AffineMatrix::from(a.to_affine() * b.to_affine());
    assert!(authored.approx_eq(&expected, 1e-12));
    assert!(!authored.approx_eq(&reversed, 1e-6));
}

#[test]
fn flop_conjugates_the_chain() {
    let t = op((0.0, 10.0), 0.0, (1.0, 1.0), (0.0, 0.0));
    let m = compose_chain(&[t], HD, ChainOptions::default());
    // A downward move in a lower-left origin is an upward move in upper-left.
    let p = m.project(Point::new(0.0, 0.0));
    assert_relative_eq!(p.y, -10.0, epsilon = 1e-9);
}

#[test]
fn scalar_and_vector_scale_compose_identically() {
    let scalar = EffectGraphFixture::scale(serde_json::json!(2.0));
    let vector = EffectGraphFixture::scale(serde_json::json!([2.0, 2.0]));
    assert_eq!(
        compose_chain(&scalar, HD, ChainOptions::default()),
        compose_chain(&vector, HD, ChainOptions::default())
    );
}

struct EffectGraphFixture;

impl EffectGraphFixture {
    fn scale(value: serde_json::Value) -> Vec<GeometryOperator> {
        let doc = serde_json::json!([
            {"class": "Transform", "subTrackIndex": 0, "node": {"scale": value, "center": [960, 540]}}
        ]);
        crate::graph::parse::EffectGraph::from_value(&doc)
            .unwrap()
            .geometry_operators()
            .unwrap()
    }
}

#[test]
fn equal_aspect_fits_source() {
    let fit = FitRect::fit(HD, HD);
    assert_eq!(
        fit,
        FitRect {
            width: 1920,
            height: 1080,
            x: 0,
            y: 0
        }
    );
    assert_eq!(fit.to_string(), "1920x1080-0-0");
}

#[test]
fn wider_source_grows_height() {
    let fit = FitRect::fit(Size::new(4096, 2160), HD);
    assert_eq!(fit.width, 4096);
    assert_eq!(fit.height, 2304);
    assert_eq!(fit.y, 72);
    assert_eq!(fit.x, 0);
}

#[test]
fn fractional_fits_round_to_the_nearest_pixel() {
    let fit = FitRect::fit(Size::new(1998, 1080), HD);
    assert_eq!(fit.to_string(), "1998x1124-0-22");
}

#[test]
fn narrower_source_grows_width() {
    let fit = FitRect::fit(Size::new(1440, 1080), HD);
    assert_eq!(fit.height, 1080);
    assert_eq!(fit.width, 1920);
    assert_eq!(fit.x, 240);
    assert_eq!(fit.y, 0);
}

#[test]
fn missing_dimensions_are_fatal() {
    let dims = FrameDimensions {
        source_width: Some(1920),
        source_height: Some(1080),
        dest_width: Some(1920),
        dest_height: None,
    };
    match GeometryCompiler::default().compile(&[], &dims) {
        Err(ShotError::MissingDimensions(msg)) => assert!(msg.contains("destination height")),
        other => panic!("expected MissingDimensions, got {other:?}"),
    }

    let zero = FrameDimensions {
        source_width: Some(0),
        ..FrameDimensions::new(HD, HD)
    };
    assert!(matches!(
        zero.resolve(),
        Err(ShotError::MissingDimensions(_))
    ));
}

#[test]
fn corner_pin_orderings_differ_only_in_corner_order() {
    let ops = [op((100.0, 50.0), 0.0, (1.0, 1.0), (0.0, 0.0))];
    let plan = GeometryCompiler::new(ChainOptions::none(), CornerOrigin::LowerLeft)
        .compile(&ops, &FrameDimensions::new(HD, HD))
        .unwrap();
    assert_eq!(
        plan.corner_pin.values(),
        &[100.0, 50.0, 2020.0, 50.0, 100.0, 1130.0, 2020.0, 1130.0]
    );
    assert_eq!(
        plan.corner_pin_for(CornerOrigin::UpperLeft).values(),
        &[100.0, 1130.0, 2020.0, 1130.0, 100.0, 50.0, 2020.0, 50.0]
    );
}

#[test]
fn plan_strings_for_external_tools() {
    let ops = [op((3.0, 4.0), 0.0, (1.0, 1.0), (0.0, 0.0))];
    let plan = GeometryCompiler::new(ChainOptions::none(), CornerOrigin::default())
        .compile(&ops, &FrameDimensions::new(Size::new(4096, 2160), HD))
        .unwrap();
    assert_eq!(plan.matrix_csv(), "1.0,0.0,0.0,0.0,1.0,0.0,3.0,4.0,1.0");
    assert_eq!(plan.crop_rect(), "4096x2304-0-72");
    assert_eq!(plan.resize_target(), "1920x1080");
}
