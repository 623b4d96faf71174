//! Dalia - 多租户物联网遥测报表后端
//!
//! 能源与燃油监控设备的报表服务

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dalia::{
    config::Settings,
    db::PostgresPool,
    middleware::{JwtAuth, RequestLogger},
    repositories::{
        CenterRepository, CompanyRepository, DeviceRepository, TelemetryRepository,
        UserRepository,
    },
    routes,
    security::{JwtManager, Secrets},
    services::{CenterService, DeviceService, FuelService, SummaryService, UserService},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    init_tracing();

    info!("🌼 Dalia 服务启动中...");

    // 加载配置
    let settings = Settings::load().expect("配置加载失败");
    info!("✅ 配置加载完成");

    // 初始化密钥
    Secrets::init().expect("密钥初始化失败");
    info!("✅ 密钥初始化完成");

    // 连接数据库
    let pg_pool = Arc::new(PostgresPool::new(&settings).await.expect("数据库连接失败"));
    info!("✅ 数据库连接成功");

    // 运行迁移
    pg_pool.run_migrations().await.expect("数据库迁移失败");
    info!("✅ 数据库迁移完成");

    // 初始化 JWT 管理器
    let jwt_manager = Arc::new(JwtManager::new(&settings).expect("JWT 初始化失败"));

    // 初始化仓库
    let user_repo = UserRepository::new((*pg_pool).clone());
    let company_repo = Arc::new(CompanyRepository::new((*pg_pool).clone()));
    let center_repo = Arc::new(CenterRepository::new((*pg_pool).clone()));
    let device_repo = DeviceRepository::new((*pg_pool).clone());
    let telemetry_repo = TelemetryRepository::new((*pg_pool).clone());

    // 初始化服务
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        jwt_manager.clone(),
        settings.jwt.expiry_seconds,
    ));
    let center_service = Arc::new(CenterService::new(
        (*center_repo).clone(),
        (*company_repo).clone(),
    ));
    let device_service = Arc::new(DeviceService::new(
        device_repo.clone(),
        (*center_repo).clone(),
        user_repo.clone(),
        telemetry_repo.clone(),
    ));
    let summary_service = Arc::new(
        SummaryService::new(
            user_repo.clone(),
            device_repo.clone(),
            (*center_repo).clone(),
            telemetry_repo.clone(),
            &settings,
        )
        .expect("汇总服务初始化失败"),
    );
    let fuel_service = Arc::new(FuelService::new(
        user_repo,
        (*center_repo).clone(),
        device_repo,
        telemetry_repo,
        &settings,
    ));

    info!("✅ 服务初始化完成");

    let server_addr = settings.server_addr();
    let workers = if settings.server.workers == 0 {
        num_cpus::get()
    } else {
        settings.server.workers
    };

    info!("🚀 服务启动在 http://{}", server_addr);
    info!("📊 工作线程数: {}", workers);

    // 启动 HTTP 服务器
    HttpServer::new(move || {
        // 配置 CORS
        let cors = Cors::default()
            .allowed_origin_fn(|origin, _req_head| {
                // 开发环境允许所有来源，生产环境应配置白名单
                origin.as_bytes().starts_with(b"http://localhost")
                    || origin.as_bytes().starts_with(b"https://")
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec!["Authorization", "Content-Type", "X-Request-ID"])
            .max_age(3600);

        // 创建认证中间件实例
        let jwt_auth = JwtAuth::new(jwt_manager.clone());

        App::new()
            // 全局中间件
            .wrap(cors)
            .wrap(RequestLogger::new())
            .wrap(middleware::Compress::default())
            // 注入服务
            .app_data(web::Data::new(pg_pool.clone()))
            .app_data(web::Data::new(jwt_manager.clone()))
            .app_data(web::Data::new(company_repo.clone()))
            .app_data(web::Data::new(center_repo.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(center_service.clone()))
            .app_data(web::Data::new(device_service.clone()))
            .app_data(web::Data::new(summary_service.clone()))
            .app_data(web::Data::new(fuel_service.clone()))
            // 配置 HTTP 路由
            .configure(|cfg| routes::configure(cfg, jwt_auth.clone()))
    })
    .workers(workers)
    .bind(&server_addr)?
    .run()
    .await
}

/// 初始化日志系统
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,dalia=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
