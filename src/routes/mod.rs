//! 路由配置模块

use crate::handlers;
use crate::middleware::JwtAuth;
use actix_web::web;

/// 配置所有路由
///
/// 需要传入认证中间件实例
pub fn configure(cfg: &mut web::ServiceConfig, jwt_auth: JwtAuth) {
    cfg
        // 健康检查路由（公开）
        .service(
            web::scope("/health")
                .route("", web::get().to(handlers::health))
                .route("/detailed", web::get().to(handlers::health_detailed))
                .route("/ready", web::get().to(handlers::ready))
                .route("/live", web::get().to(handlers::live)),
        )
        // API v1 路由
        .service(
            web::scope("/api/v1")
                // 认证路由（公开）
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(handlers::login))
                        .route("/refresh", web::post().to(handlers::refresh_token)),
                )
                // 用户路由
                .service(
                    web::scope("/users")
                        // 公开路由
                        .route("/register", web::post().to(handlers::register))
                        // 需要认证的路由
                        .service(
                            web::scope("")
                                .wrap(jwt_auth.clone())
                                .route("/me", web::get().to(handlers::get_me))
                                .route("/me/roles", web::get().to(handlers::get_my_roles))
                                // 管理员路由
                                .route("", web::get().to(handlers::list_users))
                                .route(
                                    "/{user_id}",
                                    web::delete().to(handlers::deactivate_user),
                                ),
                        ),
                )
                // 公司路由（需要认证）
                .service(
                    web::scope("/companies")
                        .wrap(jwt_auth.clone())
                        .route("", web::post().to(handlers::create_company))
                        .route("", web::get().to(handlers::list_companies))
                        .route("/{id}", web::get().to(handlers::get_company))
                        .route("/{id}", web::patch().to(handlers::update_company))
                        .route("/{id}", web::delete().to(handlers::delete_company))
                        .route(
                            "/{id}/centers",
                            web::get().to(handlers::list_company_centers),
                        )
                        .route(
                            "/{id}/users",
                            web::post().to(handlers::assign_user_to_company),
                        ),
                )
                // 中心路由（需要认证）
                .service(
                    web::scope("/centers")
                        .wrap(jwt_auth.clone())
                        .route("", web::post().to(handlers::create_center))
                        .route("/{id}", web::patch().to(handlers::update_center))
                        .route("/{id}", web::delete().to(handlers::delete_center))
                        .route("/{id}/tariff", web::get().to(handlers::get_tariff))
                        .route("/{id}/tariff", web::put().to(handlers::update_tariff)),
                )
                // 设备路由（需要认证）
                .service(
                    web::scope("/devices")
                        .wrap(jwt_auth.clone())
                        .route("", web::post().to(handlers::create_device))
                        .route("/{id}", web::get().to(handlers::get_device)),
                )
                // 电量汇总路由（需要认证）
                .service(
                    web::scope("/energy")
                        .wrap(jwt_auth.clone())
                        .route("/summary", web::get().to(handlers::energy_summary))
                        .route(
                            "/devices/{id}/consumption",
                            web::get().to(handlers::device_consumption),
                        ),
                )
                // 燃油汇总路由（需要认证）
                .service(
                    web::scope("/fuel")
                        .wrap(jwt_auth.clone())
                        .route("/summary", web::get().to(handlers::fuel_summary)),
                ),
        );
}
