use image::GrayImage;
use pickscan::geometry::BoxF;
use pickscan::kernel::zncc_score_map;
use pickscan::{
    intersection_over_union, padded_bounds, to_global, to_local, ImageView, PickScanError,
    PixelRect, Point, ScalePlan, Template, TemplatePlan,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        PickScanError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride_and_small_buffer() {
    let data = [0u8; 8];
    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        PickScanError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let data = [0u8; 3];
    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, PickScanError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(PixelRect::new(1, 1, 2, 2)).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert_eq!(roi.pixel(1, 1), Some(10));
    assert!(roi.pixel(2, 0).is_none());

    let err = view.roi(PixelRect::new(3, 3, 2, 2)).err().unwrap();
    assert_eq!(
        err,
        PickScanError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn template_plan_from_template_matches_known_stats() {
    let pixels = GrayImage::from_raw(2, 2, vec![0u8, 1, 2, 3]).unwrap();
    let template = Template::new(7, "Colt", pixels).unwrap();
    let plan = TemplatePlan::from_view(template.view().unwrap()).unwrap();

    assert_eq!((plan.width(), plan.height()), (2, 2));
    assert!((plan.var_t() - 5.0).abs() < 1e-6);
    let expected = [-1.5f32, -0.5, 0.5, 1.5];
    for (value, want) in plan.t_prime().iter().zip(expected.iter()) {
        assert!((value - want).abs() < 1e-6);
    }
}

#[test]
fn flat_template_is_rejected() {
    let template = Template::new(1, "Flat", GrayImage::from_pixel(3, 3, image::Luma([9]))).unwrap();
    let err = TemplatePlan::from_view(template.view().unwrap()).err().unwrap();
    assert_eq!(
        err,
        PickScanError::DegenerateTemplate {
            reason: "zero variance",
        }
    );
}

#[test]
fn zero_sized_template_is_rejected() {
    let err = Template::new(1, "Empty", GrayImage::new(0, 4)).unwrap_err();
    assert_eq!(
        err,
        PickScanError::InvalidDimensions {
            width: 0,
            height: 4,
        }
    );
}

#[test]
fn flat_image_windows_score_zero() {
    let tpl: Vec<u8> = (0u8..9).collect();
    let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 3, 3).unwrap()).unwrap();
    let flat = vec![128u8; 36];
    let map = zncc_score_map(ImageView::from_slice(&flat, 6, 6).unwrap(), &plan).unwrap();

    assert_eq!((map.width(), map.height()), (4, 4));
    assert_eq!(map.cells_at_or_above(0.01).count(), 0);
    assert_eq!(map.get(0, 0), Some(0.0));
}

#[test]
fn padded_region_maps_round_trip_through_global() {
    let region = PixelRect::new(704, 116, 576, 370);
    let padded = padded_bounds(region, 1920, 1080, 30);
    assert_eq!(padded.rect(), PixelRect::new(674, 86, 636, 430));

    let local = Point::new(40.0, 25.0);
    let global = to_global(local, &padded, region);
    assert_eq!(global, Point::new(714.0, 111.0));
    assert_eq!(to_local(global, &padded, region), local);
}

#[test]
fn padding_clamps_at_image_edges() {
    let padded = padded_bounds(PixelRect::new(10, 5, 50, 40), 70, 60, 30);
    assert_eq!(padded.rect(), PixelRect::new(0, 0, 70, 60));

    let outside = padded_bounds(PixelRect::new(704, 116, 576, 370), 320, 240, 30);
    assert!(outside.is_empty());
}

#[test]
fn boxes_that_only_touch_do_not_overlap() {
    let a = BoxF::centered(Point::new(10.0, 10.0), 10.0);
    let b = BoxF::centered(Point::new(20.0, 10.0), 10.0);
    assert_eq!(intersection_over_union(a, b), 0.0);

    let c = BoxF::centered(Point::new(15.0, 10.0), 10.0);
    let iou = intersection_over_union(a, c);
    assert!((iou - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn scale_plan_for_standard_regions() {
    // 636x430 padded firstPick with 100 px icons: estimate min(212, 215) = 212.
    let plan = ScalePlan::new((100, 100), (636, 430)).unwrap();
    assert!((plan.base() - 2.12).abs() < 1e-5);
    let expected = [1.696f32, 1.908, 2.12, 2.332, 2.544];
    for (scale, want) in plan.scales().iter().zip(expected.iter()) {
        assert!((scale - want).abs() < 1e-4);
    }
    assert!(ScalePlan::new((0, 10), (636, 430)).is_none());
}
