//! Builders for small PDFs used by the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Pixels of [`TestImage::Rgb`], row by row.
pub const RGB_PIXELS: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]];

/// An image placed on a test page.
#[derive(Debug, Clone, Copy)]
pub enum TestImage {
    /// 2x2 DeviceRGB, uncompressed
    Rgb,
    /// 2x2 DeviceGray, Flate compressed
    FlateGray,
    /// `DCTDecode` stream that is not a JPEG
    CorruptJpeg,
    /// 2x2 DeviceRGB nested inside a form XObject
    InForm,
    /// [`TestImage::Rgb`] pixels under an `ICCBased` profile with `/N 3`
    IccRgb,
    /// 2x2 `Indexed` over DeviceRGB with a Flate-compressed lookup stream:
    /// red, blue / blue, red
    IndexedStream,
    /// 2x2 stencil mask with `/Decode [1 0]`, set bits on the diagonal
    StencilMask,
    /// [`TestImage::Rgb`] pixels behind `[/ASCIIHexDecode /FlateDecode]`
    /// with a PNG predictor on the Flate stage
    HexFlatePredicted,
    /// Flate gray whose predictor claims 2^60 columns
    HugeColumns,
    /// 16-bit CMYK claiming 4294967295x4294967295 samples
    HugeDimensions,
}

/// One page of a test document.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub text: &'static str,
    pub images: Vec<TestImage>,
    /// Point `/Resources` at an object that does not exist
    pub broken_resources: bool,
}

impl TestPage {
    pub fn text(text: &'static str) -> Self {
        Self {
            text,
            images: Vec::new(),
            broken_resources: false,
        }
    }

    pub fn with_images(mut self, images: &[TestImage]) -> Self {
        self.images = images.to_vec();
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken_resources = true;
        self
    }
}

/// Build a document with one page per entry.
pub fn build_pdf(pages: &[TestPage]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, font_id, page);
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Build a document and save it as `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, pages: &[TestPage]) -> PathBuf {
    let path = dir.join(name);
    build_pdf(pages).save(&path).unwrap();
    path
}

fn add_page(doc: &mut Document, pages_id: ObjectId, font_id: ObjectId, page: &TestPage) -> ObjectId {
    let mut xobjects = Dictionary::new();
    let mut operations = Vec::new();

    for (i, image) in page.images.iter().enumerate() {
        let name = format!("Im{}", i + 1);
        let id = add_image(doc, *image);
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(id));
        operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![50.into(), 0.into(), 0.into(), 50.into(), 100.into(), 100.into()],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }

    if !page.text.is_empty() {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(page.text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let resources: Object = if page.broken_resources {
        Object::Reference((9999, 0))
    } else {
        Object::Dictionary(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => xobjects,
        })
    };

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources,
    })
}

fn add_image(doc: &mut Document, image: TestImage) -> ObjectId {
    match image {
        TestImage::Rgb => {
            let data = RGB_PIXELS.concat();
            doc.add_object(Stream::new(image_dict(2, 2, "DeviceRGB"), data))
        }
        TestImage::FlateGray => {
            let mut dict = image_dict(2, 2, "DeviceGray");
            dict.set("Filter", "FlateDecode");
            doc.add_object(Stream::new(dict, deflate(&[0, 64, 128, 255])))
        }
        TestImage::CorruptJpeg => {
            let mut dict = image_dict(2, 2, "DeviceRGB");
            dict.set("Filter", "DCTDecode");
            doc.add_object(Stream::new(dict, b"definitely not a jpeg".to_vec()))
        }
        TestImage::InForm => {
            let inner = add_image(doc, TestImage::Rgb);
            let form = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 1.into(), 1.into()],
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im1" => inner },
                },
            };
            doc.add_object(Stream::new(form, b"/Im1 Do".to_vec()))
        }
        TestImage::IccRgb => {
            let profile = doc.add_object(Stream::new(dictionary! { "N" => 3 }, vec![0; 16]));
            let mut dict = image_dict(2, 2, "DeviceRGB");
            dict.set(
                "ColorSpace",
                vec![Object::Name(b"ICCBased".to_vec()), Object::Reference(profile)],
            );
            doc.add_object(Stream::new(dict, RGB_PIXELS.concat()))
        }
        TestImage::IndexedStream => {
            let mut lookup_dict = Dictionary::new();
            lookup_dict.set("Filter", "FlateDecode");
            let lookup = doc.add_object(Stream::new(lookup_dict, deflate(&[255, 0, 0, 0, 0, 255])));
            let mut dict = image_dict(2, 2, "DeviceRGB");
            dict.set(
                "ColorSpace",
                vec![
                    Object::Name(b"Indexed".to_vec()),
                    Object::Name(b"DeviceRGB".to_vec()),
                    Object::Integer(1),
                    Object::Reference(lookup),
                ],
            );
            doc.add_object(Stream::new(dict, vec![0, 1, 1, 0]))
        }
        TestImage::StencilMask => {
            let dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ImageMask" => true,
                "Decode" => vec![Object::Integer(1), Object::Integer(0)],
            };
            doc.add_object(Stream::new(dict, vec![0b1000_0000, 0b0100_0000]))
        }
        TestImage::HexFlatePredicted => {
            // Row 1 uses the None filter, row 2 the Up filter.
            let predicted = [0, 255, 0, 0, 0, 255, 0, 2, 1, 0, 255, 255, 0, 255];
            let mut hex: String = deflate(&predicted)
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect();
            hex.push('>');

            let mut dict = image_dict(2, 2, "DeviceRGB");
            dict.set(
                "Filter",
                vec![
                    Object::Name(b"ASCIIHexDecode".to_vec()),
                    Object::Name(b"FlateDecode".to_vec()),
                ],
            );
            dict.set(
                "DecodeParms",
                vec![
                    Object::Null,
                    Object::Dictionary(dictionary! {
                        "Predictor" => 12,
                        "Colors" => 3,
                        "Columns" => 2,
                    }),
                ],
            );
            doc.add_object(Stream::new(dict, hex.into_bytes()))
        }
        TestImage::HugeColumns => {
            let mut dict = image_dict(2, 2, "DeviceGray");
            dict.set("Filter", "FlateDecode");
            dict.set(
                "DecodeParms",
                dictionary! { "Predictor" => 15, "Columns" => 1i64 << 60 },
            );
            doc.add_object(Stream::new(dict, deflate(&[0, 64, 128, 255])))
        }
        TestImage::HugeDimensions => {
            let mut dict = image_dict(4_294_967_295, 4_294_967_295, "DeviceCMYK");
            dict.set("BitsPerComponent", 16);
            doc.add_object(Stream::new(dict, vec![0; 64]))
        }
    }
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn image_dict(width: i64, height: i64, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    }
}
