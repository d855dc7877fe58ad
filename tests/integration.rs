use base64::Engine as _;
use leafguard::{
    acquisition::{ImageAcquirer, ImageSource, MemoryImageFile, MAX_FILE_SIZE},
    ai::{DiagnosisService, GeminiDiagnosisClient, MockDiagnosisClient},
    app::{App, AppServices},
    models::{DiagnosisResult, EncodedImage, FetchConfig},
    session::{Session, SessionState},
    Error,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

#[tokio::test]
async fn test_full_workflow_with_mock_model() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tomato.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JPEG_BYTES, "image/jpeg"))
        .mount(&server)
        .await;

    let acquirer = ImageAcquirer::new(&FetchConfig::default());
    let image = acquirer
        .from_url(&format!("{}/tomato.jpg", server.uri()))
        .await
        .unwrap();

    let model = MockDiagnosisClient::new().with_diagnosis_response("Leaf spot", "Apply fungicide");
    let mut session = Session::new();
    session.set_image(Some(image));

    let result = session.analyze(&model).await.unwrap();

    assert_eq!(
        result,
        DiagnosisResult {
            diagnosis: "Leaf spot".to_string(),
            treatment: "Apply fungicide".to_string(),
        }
    );
    assert_eq!(model.last_image().unwrap().decode().unwrap(), JPEG_BYTES);
}

#[tokio::test]
async fn test_file_upload_round_trip() {
    let payload: Vec<u8> = (0..2048u32).map(|i| (i * 7 % 251) as u8).collect();
    let file = MemoryImageFile::new(payload.clone(), "image/webp");

    let acquirer = ImageAcquirer::new(&FetchConfig::default());
    let encoded = acquirer.from_file(&file).await.unwrap();

    assert_eq!(encoded.mime_type(), Some("image/webp"));
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.payload().unwrap())
        .unwrap();
    assert_eq!(decoded, payload);
}

#[tokio::test]
async fn test_oversized_upload_never_reaches_model() {
    let file = MemoryImageFile::new(vec![0u8; MAX_FILE_SIZE as usize + 1], "image/png");
    let acquirer = ImageAcquirer::new(&FetchConfig::default());

    let err = acquirer.from_file(&file).await.unwrap_err();
    assert!(matches!(err, Error::SizeLimit { .. }));
    assert_eq!(err.to_string(), "File is too large. Maximum 5MB allowed.");
}

#[tokio::test]
async fn test_analyze_without_image_makes_no_call() {
    let model = MockDiagnosisClient::new();
    let mut session = Session::new();

    let err = session.analyze(&model).await.unwrap_err();

    assert!(matches!(err, Error::NoImage));
    assert_eq!(
        session.state(),
        &SessionState::Failure("Please upload or load an image first.".to_string())
    );
    assert_eq!(model.get_call_count(), 0);
}

#[tokio::test]
async fn test_app_diagnoses_url_against_gemini_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/leaf.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&[0x89u8, 0x50, 0x4E, 0x47][..], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(body_string_contains("\"mimeType\":\"image/png\""))
        .and(body_string_contains("\"data\":\"iVBORw==\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "{\"diagnosis\":\"Early blight\",\"treatment\":\"Remove lower leaves\"}" }]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gemini = GeminiDiagnosisClient::new("test-key".to_string(), "gemini-2.0-flash".to_string())
        .with_base_url(server.uri());

    let app = App::with_services(AppServices {
        acquirer: ImageAcquirer::new(&FetchConfig::default()),
        diagnosis: Some(Box::new(gemini)),
    });

    let result = app
        .diagnose(&ImageSource::Url(format!("{}/leaf.png", server.uri())))
        .await
        .unwrap();

    assert_eq!(result.diagnosis, "Early blight");
    assert_eq!(result.treatment, "Remove lower leaves");
}

#[tokio::test]
async fn test_content_type_failure_surfaces_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>".as_bytes(), "text/html"))
        .mount(&server)
        .await;

    let app = App::with_services(AppServices {
        acquirer: ImageAcquirer::new(&FetchConfig::default()),
        diagnosis: Some(Box::new(MockDiagnosisClient::new())),
    });

    let err = app
        .diagnose(&ImageSource::Url(server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ContentType(_)));
    assert!(err.to_string().contains("does not point to a valid image"));
}

#[tokio::test]
async fn test_treatment_entry_point_is_independent_of_images() {
    let model = MockDiagnosisClient::new().with_treatment_response("Rotate crops yearly".to_string());

    let result = model.recommend_treatment("Fusarium wilt").await.unwrap();

    assert_eq!(result.treatment_recommendations, "Rotate crops yearly");
    assert!(model.last_image().is_none());
}

#[tokio::test]
async fn test_verbatim_data_uri_reaches_model_unchanged() {
    let model = MockDiagnosisClient::new();
    let app = App::with_services(AppServices {
        acquirer: ImageAcquirer::new(&FetchConfig::default()),
        diagnosis: Some(Box::new(model.clone())),
    });

    let raw = "data:image/svg+xml;base64,PHN2Zy8+";
    app.diagnose(&ImageSource::Url(format!("  {}  ", raw)))
        .await
        .unwrap();

    assert_eq!(model.last_image(), Some(EncodedImage::from_raw(raw)));
}
