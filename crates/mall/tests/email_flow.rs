mod common;

use common::{TestApp, body_text};

#[tokio::test]
async fn confirm_without_a_code_asks_for_one() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let res = client.get("/email/confirm_authcode?authcode=123456").await;
    assert_eq!(body_text(res).await, "request");
}

#[tokio::test]
async fn issued_code_confirms_once() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let res = client
        .get("/email/authcode?receiverMail=new%40example.com")
        .await;
    assert_eq!(body_text(res).await, "success");

    let mail = app.mailer.last().unwrap();
    assert_eq!(mail.to, "new@example.com");
    let code = mail.data.code;
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let wrong = if code == "000000" { "111111" } else { "000000" };
    let res = client
        .get(&format!("/email/confirm_authcode?authcode={wrong}"))
        .await;
    assert_eq!(body_text(res).await, "fail");

    let res = client
        .get(&format!("/email/confirm_authcode?authcode={code}"))
        .await;
    assert_eq!(body_text(res).await, "success");

    let res = client
        .get(&format!("/email/confirm_authcode?authcode={code}"))
        .await;
    assert_eq!(body_text(res).await, "request");
}

#[tokio::test]
async fn invalid_address_gets_no_code() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let res = client.get("/email/authcode?receiverMail=not-an-address").await;
    assert_eq!(body_text(res).await, "fail");
    assert!(app.mailer.sent().is_empty());
}
