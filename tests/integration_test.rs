//! End-to-end tests over synthetic pages and synthetic PDFs

extern crate std;

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use panelkit::detector::{MetadataDetector, Page, VisualDetector};
use panelkit::errors::PanelResult;
use panelkit::extraction::{FailureReason, PageStatus, PanelExtractor, SlotWriter, LAYOUT_FILE, REPORT_FILE, TEXT_FILE};
use panelkit::pdf::{EmbeddedPageSource, PageSource, PdfDocument};
use panelkit::screening::PageScreener;
use panelkit::{AssignmentMethod, ExtractionConfig, PanelKit, Strategy};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Bitmaps handed out as already rendered pages
struct MemorySource {
    pages: Vec<RgbImage>,
}

impl PageSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn load_page(&self, index: usize) -> PanelResult<Page> {
        let image = self.pages.get(index)
            .cloned()
            .ok_or(panelkit::PanelError::PageOutOfRange(index))?;
        Ok(Page::from_raster(index, image))
    }
}

/// White page with checkered photographs at the given boxes
fn scanned_page(width: u32, height: u32, photos: &[(u32, u32, u32, u32)]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside = photos.iter().any(|&(bx, by, bw, bh)| x >= bx && x < bx + bw && y >= by && y < by + bh);
        if !inside {
            Rgb([255, 255, 255])
        } else if (x / 3 + y / 3) % 2 == 0 {
            Rgb([20, 22, 25])
        } else {
            Rgb([165, 160, 150])
        }
    })
}

fn extractor(out: &Path, strategy: Strategy) -> PanelExtractor {
    PanelExtractor::new(&ExtractionConfig::default(), strategy, SlotWriter::new(out))
        .with_progress(false)
}

#[test]
fn visual_pipeline_writes_four_slots_and_ignores_specks() {
    init_logging();
    let out = tempfile::tempdir().unwrap();

    // Photos of slightly different widths so each slot can be recognized by size
    let page = scanned_page(1000, 800, &[
        (60, 60, 400, 280),
        (540, 60, 380, 280),
        (60, 440, 360, 280),
        (540, 440, 340, 280),
        (700, 770, 6, 6),
    ]);
    let source = MemorySource { pages: vec![page] };

    let report = extractor(out.path(), Strategy::Visual)
        .run(&source, &VisualDetector::new(0.001), None)
        .unwrap();

    std::assert_eq!(report.total_pages, 1);
    std::assert_eq!(report.successful_pages, 1);
    std::assert!(out.path().join(REPORT_FILE).is_file());

    let page_dir = out.path().join("page_1");
    let widths: Vec<u32> = ["before.png", "during1.png", "during2.png", "after.png"].iter()
        .map(|name| image::image_dimensions(page_dir.join(name)).unwrap().0)
        .collect();

    // Contour boxes hug the photo to within the morphology radius
    for (width, expected) in widths.iter().zip([400u32, 380, 360, 340]) {
        std::assert!(width.abs_diff(expected) <= 4, "width {} vs {}", width, expected);
    }

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(page_dir.join(LAYOUT_FILE)).unwrap()).unwrap();
    std::assert_eq!(manifest["method"], "geometric");
    std::assert_eq!(manifest["slots"].as_array().unwrap().len(), 4);
}

#[test]
fn failed_slot_write_keeps_earlier_images_and_continues() {
    init_logging();
    let out = tempfile::tempdir().unwrap();

    let photos = [(60, 60, 400, 280), (540, 60, 380, 280), (60, 440, 360, 280), (540, 440, 340, 280)];
    let source = MemorySource {
        pages: vec![scanned_page(1000, 800, &photos), scanned_page(1000, 800, &photos)],
    };

    // A directory where the second slot image should go makes that write fail
    let blocked = out.path().join("page_1").join("during1.png");
    fs::create_dir_all(&blocked).unwrap();

    let report = extractor(out.path(), Strategy::Visual)
        .run(&source, &VisualDetector::new(0.001), None)
        .unwrap();

    std::assert_eq!(report.total_pages, 2);
    std::assert_eq!(report.successful_pages, 1);
    std::assert!(matches!(report.page(1).unwrap().status, PageStatus::Failed {
        reason: FailureReason::ExtractionIo { written: 1, .. },
    }));
    std::assert!(report.page(2).unwrap().is_success());

    std::assert!(out.path().join("page_1").join("before.png").is_file());
    std::assert!(!out.path().join("page_1").join("after.png").exists());
    std::assert!(out.path().join("page_2").join("after.png").is_file());
}

#[test]
fn page_with_three_photos_writes_nothing() {
    init_logging();
    let out = tempfile::tempdir().unwrap();

    let page = scanned_page(1000, 800, &[
        (60, 60, 400, 280),
        (540, 60, 380, 280),
        (60, 440, 360, 280),
    ]);
    let source = MemorySource { pages: vec![page] };

    let report = extractor(out.path(), Strategy::Visual)
        .run(&source, &VisualDetector::new(0.001), None)
        .unwrap();

    std::assert_eq!(report.successful_pages, 0);
    let outcome = report.page(1).unwrap();
    std::assert_eq!(outcome.status, PageStatus::Failed {
        reason: FailureReason::InsufficientRegions { found: 3, required: 4 },
    });
    std::assert!(!out.path().join("page_1").exists());
}

/// Image XObject with raw 8-bit samples of a single shade
fn image_xobject(doc: &mut Document, width: u32, height: u32, shade: u8, color_space: &str) -> ObjectId {
    let data = vec![shade; (width * height * 3) as usize];
    let stream = Stream::new(dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    }, data);
    doc.add_object(stream)
}

fn rgb_image(doc: &mut Document, width: u32, height: u32, shade: u8) -> ObjectId {
    image_xobject(doc, width, height, shade, "DeviceRGB")
}

/// Page painting each image at `(x, y, w, h)` in PDF user space, with an optional caption
fn add_page(doc: &mut Document, pages_id: ObjectId, images: &[(ObjectId, i64, i64, i64, i64)],
            caption: Option<&str>) -> ObjectId {
    let mut xobjects = lopdf::Dictionary::new();
    let mut operations = Vec::new();
    if let Some(caption) = caption {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new("Td", vec![50.into(), 770.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(caption)]));
        operations.push(Operation::new("ET", vec![]));
    }
    for (n, &(id, x, y, w, h)) in images.iter().enumerate() {
        let name = format!("Im{}", n + 1);
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(id));
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new("cm", vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()]));
        operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        operations.push(Operation::new("Q", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => xobjects,
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                    "Encoding" => "WinAnsiEncoding",
                },
            },
        },
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    })
}

/// Attach the page tree and catalog, then save
fn finish_pdf(mut doc: Document, pages_id: ObjectId, kids: Vec<ObjectId>, path: &Path) {
    let count = kids.len() as i64;
    doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        "Count" => count,
    }));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

const CAPTION: &str = "MR102 Bacheo km 12+400";

/// Two-page report: a captioned 2x2 photo page with a logo, then a page with two images
fn report_pdf(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let before = rgb_image(&mut doc, 160, 120, 200);
    let during1 = rgb_image(&mut doc, 150, 110, 150);
    let during2 = rgb_image(&mut doc, 140, 100, 100);
    let after = rgb_image(&mut doc, 130, 90, 50);
    let logo = rgb_image(&mut doc, 20, 20, 10);

    // Listed out of reading order; placement decides the slots
    let first = add_page(&mut doc, pages_id, &[
        (after, 330, 100, 230, 300),
        (logo, 20, 760, 20, 20),
        (during1, 330, 450, 230, 300),
        (before, 50, 450, 230, 300),
        (during2, 50, 100, 230, 300),
    ], Some(CAPTION));

    let other_a = rgb_image(&mut doc, 150, 150, 90);
    let other_b = rgb_image(&mut doc, 150, 150, 60);
    let second = add_page(&mut doc, pages_id, &[
        (other_a, 50, 400, 250, 250),
        (other_b, 320, 400, 250, 250),
    ], None);

    finish_pdf(doc, pages_id, vec![first, second], path);
}

/// One 2x2 page without text; `after_color_space` sets the bottom-right image's color space
fn grid_pdf(path: &Path, after_color_space: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let before = rgb_image(&mut doc, 160, 120, 200);
    let during1 = rgb_image(&mut doc, 150, 110, 150);
    let during2 = rgb_image(&mut doc, 140, 100, 100);
    let after = image_xobject(&mut doc, 130, 90, 50, after_color_space);

    let page = add_page(&mut doc, pages_id, &[
        (before, 50, 450, 230, 300),
        (during1, 330, 450, 230, 300),
        (during2, 50, 100, 230, 300),
        (after, 330, 100, 230, 300),
    ], None);

    finish_pdf(doc, pages_id, vec![page], path);
}

#[test]
fn metadata_pipeline_assigns_slots_by_placement() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("report.pdf");
    report_pdf(&pdf);
    let out = dir.path().join("out");

    let source = EmbeddedPageSource::open(&pdf).unwrap();
    std::assert_eq!(source.page_count(), 2);

    let report = extractor(&out, Strategy::Metadata)
        .run(&source, &MetadataDetector::new(), None)
        .unwrap();

    std::assert_eq!(report.successful_pages, 1);
    std::assert_eq!(report.page(1).unwrap().assignment, Some(AssignmentMethod::Geometric));
    std::assert!(matches!(report.page(2).unwrap().status, PageStatus::Failed {
        reason: FailureReason::InsufficientRegions { found: 2, required: 4 },
    }));

    let page_dir = out.join("page_1");
    let expected = [
        ("before.png", (160, 120), 200u8),
        ("during1.png", (150, 110), 150),
        ("during2.png", (140, 100), 100),
        ("after.png", (130, 90), 50),
    ];
    for (name, dims, shade) in expected {
        let image = image::open(page_dir.join(name)).unwrap().to_rgb8();
        std::assert_eq!(image.dimensions(), dims, "{}", name);
        std::assert_eq!(image.get_pixel(0, 0), &Rgb([shade, shade, shade]), "{}", name);
    }
    std::assert!(!out.join("page_2").exists());

    let text = fs::read_to_string(page_dir.join(TEXT_FILE)).unwrap();
    std::assert!(text.contains(CAPTION), "{:?}", text);
}

#[test]
fn page_without_text_gets_empty_text_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("grid.pdf");
    grid_pdf(&pdf, "DeviceRGB");
    let out = dir.path().join("out");

    let source = EmbeddedPageSource::open(&pdf).unwrap();
    let report = extractor(&out, Strategy::Metadata)
        .run(&source, &MetadataDetector::new(), None)
        .unwrap();

    std::assert_eq!(report.successful_pages, 1);
    let text = fs::read_to_string(out.join("page_1").join(TEXT_FILE)).unwrap();
    std::assert!(text.trim().is_empty(), "{:?}", text);
}

#[test]
fn unconvertible_color_space_fails_the_page() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("grid.pdf");
    grid_pdf(&pdf, "Lab");
    let out = dir.path().join("out");

    let source = EmbeddedPageSource::open(&pdf).unwrap();
    let report = extractor(&out, Strategy::Metadata)
        .run(&source, &MetadataDetector::new(), None)
        .unwrap();

    std::assert_eq!(report.successful_pages, 0);
    let outcome = report.page(1).unwrap();
    match &outcome.status {
        PageStatus::Failed { reason: FailureReason::ExtractionIo { written, message } } => {
            std::assert_eq!(*written, 3);
            std::assert!(message.contains("Unsupported color model"), "{}", message);
        }
        other => std::panic!("unexpected status {:?}", other),
    }

    let page_dir = out.join("page_1");
    std::assert!(page_dir.join("during2.png").is_file());
    std::assert!(!page_dir.join("after.png").exists());
}

#[test]
fn screening_counts_large_images_and_filters_pages() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("report.pdf");
    report_pdf(&pdf);

    let doc = PdfDocument::load(&pdf).unwrap();
    let infos = PageScreener::new(&ExtractionConfig::default()).screen(&doc);

    std::assert_eq!(infos.len(), 2);
    std::assert_eq!((infos[0].image_count, infos[0].large_image_count), (5, 4));
    std::assert!(infos[0].qualifies);
    std::assert_eq!(infos[1].large_image_count, 2);
    std::assert!(!infos[1].qualifies);
    std::assert_eq!(PageScreener::qualifying_pages(&infos), vec![0]);

    let filtered = dir.path().join("filtered.pdf");
    let written = PageScreener::write_filtered(&doc, &infos, &filtered).unwrap();
    std::assert_eq!(written.as_deref(), Some(filtered.as_path()));
    std::assert_eq!(PdfDocument::load(&filtered).unwrap().page_count(), 1);
}

#[test]
fn screen_first_extraction_keeps_page_numbers() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("report.pdf");
    report_pdf(&pdf);
    let out = dir.path().join("out");

    let kit = PanelKit::new(ExtractionConfig::default()).unwrap().with_progress(false);
    let report = kit.extract_screened(&pdf, &out, Strategy::Metadata).unwrap();

    std::assert_eq!(report.total_pages, 1);
    std::assert_eq!(report.successful_pages, 1);
    std::assert!(out.join("page_1").join("after.png").is_file());
}

#[test]
fn organizer_groups_pages_by_activity() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("pages");
    let target = dir.path().join("organized");

    let labels = [
        ("page_1", Some(r#"{"actividad": "MR102-Bacheo"}"#)),
        ("page_2", Some(r#"{"actividad": "MR102-Bacheo"}"#)),
        ("page_3", Some(r#"{"activity": "Pintura"}"#)),
        ("page_4", None),
    ];
    for (name, analysis) in labels {
        let page = source.join(name);
        fs::create_dir_all(&page).unwrap();
        RgbImage::new(4, 4).save(page.join("before.png")).unwrap();
        if let Some(json) = analysis {
            fs::write(page.join("analysis.json"), json).unwrap();
        }
    }

    let summary = panelkit::organizer::OutputOrganizer::new(&source, &target).organize().unwrap();

    std::assert_eq!(summary.total_pages_processed, 3);
    std::assert_eq!(summary.activities_found.get("MR102-Bacheo"), Some(&2));
    std::assert_eq!(summary.activities_found.get("actividades_no_reconocidas"), Some(&1));
    std::assert_eq!(summary.organization_stats.total_activity_folders, 2);
    std::assert_eq!(summary.organization_stats.total_sets_organized, 3);

    std::assert!(target.join("MR102-Bacheo").join("1").join("before.png").is_file());
    std::assert!(target.join("MR102-Bacheo").join("2").join("analysis.json").is_file());
    std::assert!(target.join("actividades_no_reconocidas").join("1").join("before.png").is_file());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.join("summary.json")).unwrap()).unwrap();
    std::assert_eq!(written["organization_stats"]["total_sets_organized"], 3);
}
