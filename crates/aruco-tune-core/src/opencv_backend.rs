//! OpenCV ArUco backend (feature `opencv`).
//!
//! Maps [`DetectorParams`] onto `cv::aruco::DetectorParameters` and wraps
//! `cv::aruco::ArucoDetector::detectMarkers`. Preprocessing runs through
//! `imgproc` so the benchmark times OpenCV's own CLAHE, bilateral filter and
//! Otsu threshold.

use crate::preprocess::{BilateralParams, ClaheParams, Preprocessor};
use crate::{
    CornerRefineMethod, DetectError, DetectorFactory, DetectorParams, GrayImage, GrayImageView,
    Marker, MarkerDetector, MarkerDictionary,
};
use nalgebra::Point2;
use opencv::core::{Mat, Point2f, Scalar, Size, Vector, BORDER_DEFAULT, CV_8UC1};
use opencv::imgproc::{self, THRESH_BINARY, THRESH_OTSU};
use opencv::objdetect::{
    self, ArucoDetector, CornerRefineMethod as CvRefine, DetectorParameters,
    PredefinedDictionaryType, RefineParameters,
};
use opencv::prelude::*;

/// Creates [`OpenCvArucoDetector`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenCvArucoFactory;

impl DetectorFactory for OpenCvArucoFactory {
    type Detector = OpenCvArucoDetector;

    fn create(&self, params: &DetectorParams) -> Result<Self::Detector, DetectError> {
        OpenCvArucoDetector::new(params)
    }

    fn preprocessor(&self) -> Result<Box<dyn Preprocessor>, DetectError> {
        Ok(Box::new(OpenCvPreprocessor::default()))
    }
}

/// Preprocessing through `cv::imgproc`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpenCvPreprocessor {
    pub clahe: ClaheParams,
    pub bilateral: BilateralParams,
}

impl Preprocessor for OpenCvPreprocessor {
    fn clahe(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        let tiles = Size::new(to_i32(self.clahe.tiles_x, src)?, to_i32(self.clahe.tiles_y, src)?);
        let mut clahe = imgproc::create_clahe(self.clahe.clip_limit, tiles)?;
        let mat = gray_to_mat(src)?;
        let mut dst = Mat::default();
        clahe.apply(&mat, &mut dst)?;
        mat_to_gray(&dst)
    }

    fn bilateral(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        let mat = gray_to_mat(src)?;
        let mut dst = Mat::default();
        imgproc::bilateral_filter(
            &mat,
            &mut dst,
            to_i32(self.bilateral.diameter, src)?,
            f64::from(self.bilateral.sigma_color),
            f64::from(self.bilateral.sigma_space),
            BORDER_DEFAULT,
        )?;
        mat_to_gray(&dst)
    }

    fn otsu_binarize(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        let mat = gray_to_mat(src)?;
        let mut dst = Mat::default();
        imgproc::threshold(&mat, &mut dst, 0.0, 255.0, THRESH_BINARY | THRESH_OTSU)?;
        mat_to_gray(&dst)
    }
}

/// A configured `cv::aruco::ArucoDetector`.
pub struct OpenCvArucoDetector {
    inner: ArucoDetector,
}

impl OpenCvArucoDetector {
    pub fn new(params: &DetectorParams) -> Result<Self, DetectError> {
        let dictionary = objdetect::get_predefined_dictionary(cv_dictionary(params.dictionary))?;
        let cv_params = cv_detector_parameters(params)?;
        let refine = RefineParameters::new(10.0, 3.0, true)?;
        let inner = ArucoDetector::new(&dictionary, &cv_params, refine)?;
        Ok(Self { inner })
    }
}

impl MarkerDetector for OpenCvArucoDetector {
    fn detect(&self, image: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError> {
        let mat = gray_to_mat(image)?;
        let mut corners: Vector<Vector<Point2f>> = Vector::new();
        let mut ids: Vector<i32> = Vector::new();
        let mut rejected: Vector<Vector<Point2f>> = Vector::new();
        self.inner
            .detect_markers(&mat, &mut corners, &mut ids, &mut rejected)?;

        let mut out = Vec::with_capacity(ids.len());
        for (id, quad) in ids.iter().zip(corners.iter()) {
            if quad.len() != 4 {
                return Err(DetectError::Backend(format!(
                    "marker {id} has {} corners",
                    quad.len()
                )));
            }
            let mut pts = [Point2::new(0.0f32, 0.0f32); 4];
            for (dst, src) in pts.iter_mut().zip(quad.iter()) {
                *dst = Point2::new(src.x, src.y);
            }
            out.push(Marker::new(id, pts));
        }
        Ok(out)
    }
}

fn cv_dictionary(dict: MarkerDictionary) -> PredefinedDictionaryType {
    match dict {
        MarkerDictionary::Dict7x7_50 => PredefinedDictionaryType::DICT_7X7_50,
    }
}

fn cv_refine_method(method: CornerRefineMethod) -> i32 {
    let m = match method {
        CornerRefineMethod::None => CvRefine::CORNER_REFINE_NONE,
        CornerRefineMethod::SubPixel => CvRefine::CORNER_REFINE_SUBPIX,
        CornerRefineMethod::Contour => CvRefine::CORNER_REFINE_CONTOUR,
        CornerRefineMethod::AprilTag => CvRefine::CORNER_REFINE_APRILTAG,
    };
    m as i32
}

fn cv_detector_parameters(params: &DetectorParams) -> Result<DetectorParameters, DetectError> {
    let mut p = DetectorParameters::default()?;
    p.set_adaptive_thresh_constant(params.adaptive_thresh_constant);
    p.set_corner_refinement_method(cv_refine_method(params.corner_refinement_method));
    p.set_corner_refinement_max_iterations(params.corner_refinement_max_iterations);
    p.set_corner_refinement_win_size(params.corner_refinement_win_size);
    p.set_corner_refinement_min_accuracy(params.corner_refinement_min_accuracy);
    p.set_min_marker_perimeter_rate(params.min_marker_perimeter_rate);
    p.set_max_marker_perimeter_rate(params.max_marker_perimeter_rate);
    p.set_polygonal_approx_accuracy_rate(params.polygonal_approx_accuracy_rate);
    p.set_min_corner_distance_rate(params.min_corner_distance_rate);
    p.set_error_correction_rate(params.error_correction_rate);
    p.set_detect_inverted_marker(params.detect_inverted_marker);
    Ok(p)
}

fn to_i32(n: usize, image: &GrayImageView<'_>) -> Result<i32, DetectError> {
    i32::try_from(n).map_err(|_| DetectError::InvalidDimensions {
        width: image.width,
        height: image.height,
    })
}

/// Copy a gray view into a freshly allocated `CV_8UC1` matrix.
pub fn gray_to_mat(image: &GrayImageView<'_>) -> Result<Mat, DetectError> {
    let rows = to_i32(image.height, image)?;
    let cols = to_i32(image.width, image)?;
    let mut mat = Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?;
    mat.data_bytes_mut()?.copy_from_slice(image.data);
    Ok(mat)
}

/// Copy a `CV_8UC1` matrix into an owned gray image.
pub fn mat_to_gray(mat: &Mat) -> Result<GrayImage, DetectError> {
    if mat.typ() != CV_8UC1 {
        return Err(DetectError::Backend(format!(
            "expected an 8-bit single channel matrix, got type {}",
            mat.typ()
        )));
    }
    let owned;
    let mat = if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };
    let width = usize::try_from(mat.cols()).unwrap_or(0);
    let height = usize::try_from(mat.rows()).unwrap_or(0);
    GrayImage::from_vec(width, height, mat.data_bytes()?.to_vec())
}
