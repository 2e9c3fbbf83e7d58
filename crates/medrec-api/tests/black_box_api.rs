use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

const SAMPLE_CSV: &str = "\
Brand,Product Type,Subtype,Product Name,Amount,Unit of Measure,Location,Available,Unit Cost,Total Cost
Coastal,FLOWER,Indica,Sunset Sherbet,3.5,g,LIVE MEDICAL PRODUCTS,10,11.00,110.00
Coastal,FLOWER,Indica,Sunset Sherbet,3.5,g,A. LIVE ADULT USE PRODUCTS,3,11.00,33.00
Apex,VAPE,,Citrus Cartridge,1,g,LIVE MEDICAL PRODUCTS,4,25.00,100.00
Zenith,FLOWER,Sativa,Green Crack,3.5,g,LIVE MEDICAL PRODUCTS,8,9.50,76.00
Zenith,FLOWER,Sativa,Green Crack,3.5,g,A. LIVE ADULT USE PRODUCTS,6,9.50,57.00
";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = medrec_api::app::build_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn csv_form(contents: &str) -> Form {
    Form::new().part(
        "file",
        Part::bytes(contents.as_bytes().to_vec()).file_name("inventory.csv"),
    )
}

#[tokio::test]
async fn status_endpoint_reports_active() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(&server.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "active");
    assert_eq!(body["service"], "Med to Rec Report");
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn upload_returns_the_unformatted_report() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(&server.base_url)
        .multipart(csv_form(SAMPLE_CSV))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["records_found"], 2);
    assert_eq!(body["total_units"], 14);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["product_name"], "Sunset Sherbet");
    assert_eq!(data[0]["adult_available"], 3);
    assert_eq!(data[0]["total_cost"], serde_json::json!(110.0));
    assert_eq!(data[1]["adult_available"], 0);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(&server.base_url)
        .multipart(Form::new().text("note", "no file here"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn upload_with_missing_column_is_a_server_error() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let broken = "Product Type,Subtype,Product Name,Amount,Unit of Measure,Location,Available,Unit Cost,Total Cost\n";
    let res = client
        .post(&server.base_url)
        .multipart(csv_form(broken))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Brand"));
}

#[tokio::test]
async fn upload_caps_echoed_rows() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut csv = String::from(
        "Brand,Product Type,Subtype,Product Name,Amount,Unit of Measure,Location,Available,Unit Cost,Total Cost\n",
    );
    for idx in 0..12 {
        csv.push_str(&format!(
            "Brand{idx:02},FLOWER,,Strain {idx:02},3.5,g,LIVE MEDICAL PRODUCTS,2,10.00,20.00\n"
        ));
    }

    let res = client
        .post(&server.base_url)
        .multipart(csv_form(&csv))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["records_found"], 12);
    assert_eq!(body["total_units"], 24);
    assert_eq!(
        body["data"].as_array().unwrap().len(),
        medrec_api::app::RESPONSE_ROW_LIMIT
    );
}

#[tokio::test]
async fn upload_with_no_medical_rows_reports_empty() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let adult_only = "\
Brand,Product Type,Subtype,Product Name,Amount,Unit of Measure,Location,Available,Unit Cost,Total Cost
Coastal,FLOWER,Indica,Sunset Sherbet,3.5,g,A. LIVE ADULT USE PRODUCTS,3,11.00,33.00
";
    let res = client
        .post(&server.base_url)
        .multipart(csv_form(adult_only))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["records_found"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    // Empty reports omit the unit total entirely.
    assert!(body.get("total_units").is_none());
}
