//! Fixtures: PDFs built with lopdf, multipart forms and `.docx` inspection.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::{Cursor, Read};

/// Single-page PDF with one text line per entry, in Helvetica
pub fn create_text_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 24.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("Td", vec![0.into(), (-36).into()]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}

pub fn pdf_part(data: Vec<u8>, file_name: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name)
        .mime_type("application/pdf")
}

pub fn pdf_form(data: Vec<u8>, file_name: &str) -> MultipartForm {
    MultipartForm::new().add_part("pdfFile", pdf_part(data, file_name))
}

/// Text of `word/document.xml` inside a `.docx`
pub fn docx_document_xml(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("docx is a zip archive");
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .expect("document.xml present")
        .read_to_string(&mut xml)
        .expect("utf-8 xml");
    xml
}

/// POST a form to /convert and return the parsed JSON body with its status
pub async fn convert(client: &TestServer, form: MultipartForm) -> (u16, serde_json::Value) {
    let response = client.post("/convert").multipart(form).await;
    let status = response.status_code().as_u16();
    (status, response.json())
}

/// Convert, assert success and return the download URL
pub async fn convert_ok(client: &TestServer, form: MultipartForm) -> String {
    let (status, body) = convert(client, form).await;
    assert_eq!(status, 200, "conversion failed: {}", body);
    assert_eq!(body["success"], true);
    body["downloadUrl"]
        .as_str()
        .expect("Expected 'downloadUrl' in response")
        .to_string()
}
