#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::{Duration, Local};
use http_body_util::BodyExt;
use mall::{
    abstract_trait::{
        admin::AdminRepositoryTrait,
        category::CategoryRepositoryTrait,
        member::MemberRepositoryTrait,
        product::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
        session::SessionStoreTrait,
    },
    di::{DependenciesInject, DependenciesInjectDeps, Repositories},
    domain::{
        requests::{
            member::{JoinMemberRequest, ModifyMemberRequest},
            product::{ProductDeleteFilter, ProductForm},
        },
        response::session::SessionData,
    },
    handler::AppRouter,
    middleware::session::SESSION_COOKIE,
    model::{admin::Admin, category::Category, member::Member, product::Product},
    state::AppState,
    utils::{FileStorage, SearchCriteria, SearchType},
};
use shared::{
    abstract_trait::{EmailRequest, EmailServiceTrait, HashingTrait},
    config::Hashing,
    errors::{RepositoryError, ServiceError},
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_PW: &str = "admin1234";
pub const MEMBER_ID: &str = "docuser";
pub const MEMBER_PW: &str = "secret12";
pub const MEMBER_NAME: &str = "Kim Doc";
pub const MEMBER_EMAIL: &str = "doc@example.com";

#[derive(Default)]
pub struct MemoryMembers {
    rows: Mutex<HashMap<String, Member>>,
}

impl MemoryMembers {
    pub fn get(&self, mbsp_id: &str) -> Option<Member> {
        self.rows.lock().unwrap().get(mbsp_id).cloned()
    }

    pub fn insert(&self, member: Member) {
        self.rows
            .lock()
            .unwrap()
            .insert(member.mbsp_id.clone(), member);
    }
}

pub fn member(mbsp_id: &str, password_hash: &str) -> Member {
    Member {
        mbsp_id: mbsp_id.to_string(),
        mbsp_name: MEMBER_NAME.to_string(),
        mbsp_email: MEMBER_EMAIL.to_string(),
        mbsp_password: password_hash.to_string(),
        mbsp_zipcode: None,
        mbsp_addr: None,
        mbsp_deaddr: None,
        mbsp_phone: None,
        mbsp_nick: None,
        mbsp_receive: "N".to_string(),
        mbsp_point: 0,
        mbsp_lastlogin: None,
        mbsp_datesub: Some(Local::now().naive_local()),
        mbsp_updatedate: None,
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemoryMembers {
    async fn find_by_id(&self, mbsp_id: &str) -> Result<Option<Member>, RepositoryError> {
        Ok(self.get(mbsp_id))
    }

    async fn exists(&self, mbsp_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.rows.lock().unwrap().contains_key(mbsp_id))
    }

    async fn find_by_name_and_email(
        &self,
        mbsp_name: &str,
        mbsp_email: &str,
    ) -> Result<Option<Member>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|m| m.mbsp_name == mbsp_name && m.mbsp_email == mbsp_email)
            .cloned())
    }

    async fn find_by_id_and_email(
        &self,
        mbsp_id: &str,
        mbsp_email: &str,
    ) -> Result<Option<Member>, RepositoryError> {
        Ok(self.get(mbsp_id).filter(|m| m.mbsp_email == mbsp_email))
    }

    async fn create(
        &self,
        req: &JoinMemberRequest,
        password_hash: &str,
    ) -> Result<Member, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&req.mbsp_id) {
            return Err(RepositoryError::AlreadyExists(req.mbsp_id.clone()));
        }

        let created = Member {
            mbsp_id: req.mbsp_id.clone(),
            mbsp_name: req.mbsp_name.clone(),
            mbsp_email: req.mbsp_email.clone(),
            mbsp_password: password_hash.to_string(),
            mbsp_zipcode: req.mbsp_zipcode.clone(),
            mbsp_addr: req.mbsp_addr.clone(),
            mbsp_deaddr: req.mbsp_deaddr.clone(),
            mbsp_phone: req.mbsp_phone.clone(),
            mbsp_nick: req.mbsp_nick.clone(),
            mbsp_receive: req.mbsp_receive.clone(),
            mbsp_point: 0,
            mbsp_lastlogin: None,
            mbsp_datesub: Some(Local::now().naive_local()),
            mbsp_updatedate: None,
        };
        rows.insert(created.mbsp_id.clone(), created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        mbsp_id: &str,
        req: &ModifyMemberRequest,
    ) -> Result<Member, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(mbsp_id).ok_or(RepositoryError::NotFound)?;

        row.mbsp_name = req.mbsp_name.clone();
        row.mbsp_email = req.mbsp_email.clone();
        row.mbsp_zipcode = req.mbsp_zipcode.clone();
        row.mbsp_addr = req.mbsp_addr.clone();
        row.mbsp_deaddr = req.mbsp_deaddr.clone();
        row.mbsp_phone = req.mbsp_phone.clone();
        row.mbsp_nick = req.mbsp_nick.clone();
        row.mbsp_receive = req.mbsp_receive.clone();
        row.mbsp_updatedate = Some(Local::now().naive_local());

        Ok(row.clone())
    }

    async fn update_password(
        &self,
        mbsp_id: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(mbsp_id).ok_or(RepositoryError::NotFound)?;
        row.mbsp_password = password_hash.to_string();
        Ok(())
    }

    async fn update_last_login(&self, mbsp_id: &str) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(mbsp_id).ok_or(RepositoryError::NotFound)?;
        row.mbsp_lastlogin = Some(Local::now().naive_local());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAdmins {
    rows: Mutex<HashMap<String, Admin>>,
}

impl MemoryAdmins {
    pub fn get(&self, ad_userid: &str) -> Option<Admin> {
        self.rows.lock().unwrap().get(ad_userid).cloned()
    }
}

#[async_trait]
impl AdminRepositoryTrait for MemoryAdmins {
    async fn find_by_id(&self, ad_userid: &str) -> Result<Option<Admin>, RepositoryError> {
        Ok(self.get(ad_userid))
    }

    async fn update_login_date(&self, ad_userid: &str) -> Result<Admin, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(ad_userid).ok_or(RepositoryError::NotFound)?;
        row.login_date = Some(Local::now().naive_local());
        Ok(row.clone())
    }

    async fn create_if_absent(
        &self,
        ad_userid: &str,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(ad_userid) {
            return Ok(false);
        }
        rows.insert(
            ad_userid.to_string(),
            Admin {
                ad_userid: ad_userid.to_string(),
                ad_passwd: password_hash.to_string(),
                login_date: None,
            },
        );
        Ok(true)
    }
}

pub struct MemoryCategories {
    rows: Vec<Category>,
}

impl Default for MemoryCategories {
    fn default() -> Self {
        let category = |cate_code: i32, cate_prtcode: Option<i32>, cate_name: &str| Category {
            cate_code,
            cate_prtcode,
            cate_name: cate_name.to_string(),
        };

        Self {
            rows: vec![
                category(1, None, "Books"),
                category(2, None, "Stationery"),
                category(11, Some(1), "Fiction"),
                category(12, Some(1), "Computing"),
                category(13, Some(1), "Comics"),
                category(21, Some(2), "Pens"),
                category(22, Some(2), "Notebooks"),
            ],
        }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for MemoryCategories {
    async fn find_first_level(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .rows
            .iter()
            .filter(|c| c.cate_prtcode.is_none())
            .cloned()
            .collect())
    }

    async fn find_children(&self, cate_prtcode: i32) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .rows
            .iter()
            .filter(|c| c.cate_prtcode == Some(cate_prtcode))
            .cloned()
            .collect())
    }

    async fn find_by_code(&self, cate_code: i32) -> Result<Option<Category>, RepositoryError> {
        Ok(self.rows.iter().find(|c| c.cate_code == cate_code).cloned())
    }
}

#[derive(Default)]
pub struct MemoryProducts {
    rows: Mutex<Vec<Product>>,
    next_id: Mutex<i32>,
    pub fail_writes: AtomicBool,
}

impl MemoryProducts {
    pub fn all(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, pro_num: i32) -> Option<Product> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.pro_num == pro_num)
            .cloned()
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::ForeignKey(
                "insert or update on table \"products\" violates foreign key constraint".into(),
            ));
        }
        Ok(())
    }

    fn matches(product: &Product, cri: &SearchCriteria) -> bool {
        let Some((search_type, keyword)) = cri.search() else {
            return true;
        };
        let keyword = keyword.to_lowercase();
        let name = product.pro_name.to_lowercase().contains(&keyword);
        let publisher = product.pro_publisher.to_lowercase().contains(&keyword);

        match search_type {
            SearchType::N => name,
            SearchType::P => publisher,
            SearchType::NP => name || publisher,
        }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for MemoryProducts {
    async fn find_all(&self, cri: &SearchCriteria) -> Result<Vec<Product>, RepositoryError> {
        let mut rows: Vec<Product> = self
            .all()
            .into_iter()
            .filter(|p| Self::matches(p, cri))
            .collect();
        rows.sort_by(|a, b| b.pro_num.cmp(&a.pro_num));

        Ok(rows
            .into_iter()
            .skip(cri.criteria.page_start() as usize)
            .take(cri.criteria.per_page_num() as usize)
            .collect())
    }

    async fn count(&self, cri: &SearchCriteria) -> Result<i64, RepositoryError> {
        Ok(self.all().iter().filter(|p| Self::matches(p, cri)).count() as i64)
    }

    async fn find_by_id(&self, pro_num: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.get(pro_num))
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for MemoryProducts {
    async fn create(
        &self,
        form: &ProductForm,
        pro_up_folder: &str,
        pro_img: &str,
    ) -> Result<Product, RepositoryError> {
        self.check_writable()?;

        let pro_num = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };

        let product = Product {
            pro_num,
            cate_code: form.cate_code,
            pro_name: form.pro_name.clone(),
            pro_price: form.pro_price,
            pro_discount: form.pro_discount,
            pro_publisher: form.pro_publisher.clone(),
            pro_content: form.pro_content.clone(),
            pro_up_folder: pro_up_folder.to_string(),
            pro_img: pro_img.to_string(),
            pro_amount: form.pro_amount,
            pro_buy: form.pro_buy.clone(),
            pro_review: 0,
            pro_date: Some(Local::now().naive_local()),
            pro_updatedate: None,
        };
        self.rows.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        pro_num: i32,
        form: &ProductForm,
        pro_up_folder: &str,
        pro_img: &str,
    ) -> Result<Product, RepositoryError> {
        self.check_writable()?;

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.pro_num == pro_num)
            .ok_or(RepositoryError::NotFound)?;

        row.cate_code = form.cate_code;
        row.pro_name = form.pro_name.clone();
        row.pro_price = form.pro_price;
        row.pro_discount = form.pro_discount;
        row.pro_publisher = form.pro_publisher.clone();
        row.pro_content = form.pro_content.clone();
        row.pro_up_folder = pro_up_folder.to_string();
        row.pro_img = pro_img.to_string();
        row.pro_amount = form.pro_amount;
        row.pro_buy = form.pro_buy.clone();
        row.pro_updatedate = Some(Local::now().naive_local());

        Ok(row.clone())
    }

    async fn delete(&self, pro_num: i32) -> Result<Option<Product>, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let position = rows.iter().position(|p| p.pro_num == pro_num);
        Ok(position.map(|i| rows.remove(i)))
    }

    async fn delete_selected(
        &self,
        filter: &ProductDeleteFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let (deleted, kept): (Vec<Product>, Vec<Product>) = rows.drain(..).partition(|p| {
            filter.pro_nums.contains(&p.pro_num)
                && filter
                    .pro_name
                    .as_deref()
                    .is_none_or(|name| p.pro_name == name)
        });
        *rows = kept;
        Ok(deleted)
    }
}

#[derive(Default)]
pub struct MemorySessions {
    rows: Mutex<HashMap<String, SessionData>>,
}

impl MemorySessions {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, session_id: &str) -> Option<SessionData> {
        self.rows.lock().unwrap().get(session_id).cloned()
    }
}

#[async_trait]
impl SessionStoreTrait for MemorySessions {
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, ServiceError> {
        Ok(self.get(session_id))
    }

    async fn save(
        &self,
        session_id: &str,
        data: &SessionData,
        _ttl: Duration,
    ) -> Result<(), ServiceError> {
        self.rows
            .lock()
            .unwrap()
            .insert(session_id.to_string(), data.clone());
        Ok(())
    }

    async fn refresh(&self, _session_id: &str, _ttl: Duration) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), ServiceError> {
        self.rows.lock().unwrap().remove(session_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailRequest>>,
    pub fail: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<EmailRequest> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EmailServiceTrait for RecordingMailer {
    async fn send(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Mail("SMTP relay refused the message".into()));
        }
        self.sent.lock().unwrap().push(req.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub members: Arc<MemoryMembers>,
    pub admins: Arc<MemoryAdmins>,
    pub products: Arc<MemoryProducts>,
    pub sessions: Arc<MemorySessions>,
    pub mailer: Arc<RecordingMailer>,
    pub hashing: Arc<Hashing>,
    pub upload_dir: TempDir,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// App with one admin and one member account already registered.
    pub async fn new() -> Self {
        let members = Arc::new(MemoryMembers::default());
        let admins = Arc::new(MemoryAdmins::default());
        let products = Arc::new(MemoryProducts::default());
        let sessions = Arc::new(MemorySessions::default());
        let mailer = Arc::new(RecordingMailer::default());
        let hashing = Arc::new(Hashing::with_cost(4));
        let upload_dir = TempDir::new().unwrap();

        let member_hash = hashing.hash_password(MEMBER_PW).await.unwrap();
        members.insert(member(MEMBER_ID, &member_hash));

        let admin_hash = hashing.hash_password(ADMIN_PW).await.unwrap();
        admins.create_if_absent(ADMIN_ID, &admin_hash).await.unwrap();

        let di_container = DependenciesInject::new(DependenciesInjectDeps {
            repositories: Repositories {
                member: members.clone(),
                admin: admins.clone(),
                category: Arc::new(MemoryCategories::default()),
                product_query: products.clone(),
                product_command: products.clone(),
            },
            hashing: hashing.clone(),
            mailer: mailer.clone(),
            storage: FileStorage::new(upload_dir.path()),
            base_url: "http://docmall.test".to_string(),
        });

        let state = Arc::new(
            AppState::with_dependencies(di_container, sessions.clone(), Duration::minutes(30))
                .await,
        );

        Self {
            router: AppRouter::build(state.clone()),
            members,
            admins,
            products,
            sessions,
            mailer,
            hashing,
            upload_dir,
            state,
        }
    }

    pub fn client(&self) -> Client {
        Client {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

/// A browser stand-in that keeps the session cookie between requests.
pub struct Client {
    router: Router,
    pub cookie: Option<String>,
}

impl Client {
    pub async fn send(&mut self, mut req: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            req.headers_mut().insert(
                header::COOKIE,
                format!("{SESSION_COOKIE}={cookie}").parse().unwrap(),
            );
        }

        let res = self.router.clone().oneshot(req).await.unwrap();

        for value in res.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let Some(pair) = raw.split(';').next() else {
                continue;
            };
            if let Some(id) = pair.strip_prefix(&format!("{SESSION_COOKIE}=")) {
                self.cookie = (!id.is_empty()).then(|| id.to_string());
            }
        }

        res
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, pairs: &[(&str, &str)]) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();

        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn post_multipart(&mut self, uri: &str, form: MultipartForm) -> Response<Body> {
        let (content_type, body) = form.finish();
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn login_admin(&mut self) {
        let res = self
            .post_form(
                "/admin/admin_ok",
                &[("ad_userid", ADMIN_ID), ("ad_passwd", ADMIN_PW)],
            )
            .await;
        assert_eq!(location(&res), "/admin/ad_menu");
    }

    pub async fn login_member(&mut self) -> Response<Body> {
        self.post_form(
            "/member/login",
            &[("mbsp_id", MEMBER_ID), ("mbsp_password", MEMBER_PW)],
        )
        .await
    }
}

const BOUNDARY: &str = "----docmall-test-boundary";

#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn product_fields(self, cate_code: &str, pro_name: &str, pro_publisher: &str) -> Self {
        self.text("cate_code", cate_code)
            .text("pro_name", pro_name)
            .text("pro_price", "18000")
            .text("pro_discount", "10")
            .text("pro_publisher", pro_publisher)
            .text("pro_content", "<p>description</p>")
            .text("pro_amount", "7")
            .text("pro_buy", "Y")
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn location(res: &Response<Body>) -> String {
    assert_eq!(
        res.status(),
        StatusCode::SEE_OTHER,
        "expected a redirect, got {}",
        res.status()
    );
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text(res: Response<Body>) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
