// src/main.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::middleware::auth::{auth_guard, super_admin_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = Config::from_env().expect("Falha ao carregar a configuração do ambiente.");

    let app_state = AppState::new(&config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante os templates de e-mail padrão (idempotente); falha aqui não
    // derruba o servidor.
    if let Err(e) = app_state.template_email_service.criar_templates_padrao().await {
        tracing::warn!("Falha ao criar templates padrão: {}", e);
    }

    // --- Rotas de autenticação ---
    let rotas_auth_publicas = Router::new().route("/login", post(handlers::auth::login));

    let rotas_auth_protegidas = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/change-password", post(handlers::auth::alterar_senha))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let rotas_auth = rotas_auth_publicas.merge(rotas_auth_protegidas);

    // --- Sedes ---
    let rotas_sedes = Router::new()
        .route("/", get(handlers::sedes::listar).post(handlers::sedes::criar))
        .route("/ativas", get(handlers::sedes::listar_ativas))
        .route("/statistics", get(handlers::sedes::estatisticas))
        .route(
            "/{id}",
            get(handlers::sedes::buscar)
                .put(handlers::sedes::atualizar)
                .delete(handlers::sedes::excluir),
        )
        .route("/{id}/toggle-status", post(handlers::sedes::alternar_status));

    // --- Voluntários ---
    let rotas_voluntarios = Router::new()
        .route(
            "/",
            get(handlers::voluntarios::listar).post(handlers::voluntarios::criar),
        )
        .route("/statistics", get(handlers::voluntarios::estatisticas))
        .route(
            "/{id}",
            get(handlers::voluntarios::buscar)
                .put(handlers::voluntarios::atualizar)
                .delete(handlers::voluntarios::excluir),
        )
        .route("/{id}/status", patch(handlers::voluntarios::atualizar_status));

    // --- Assistidos ---
    let rotas_assistidos = Router::new()
        .route(
            "/",
            get(handlers::assistidos::listar).post(handlers::assistidos::criar),
        )
        .route("/statistics", get(handlers::assistidos::estatisticas))
        .route(
            "/{id}",
            get(handlers::assistidos::buscar)
                .put(handlers::assistidos::atualizar)
                .delete(handlers::assistidos::excluir),
        )
        .route("/{id}/status", patch(handlers::assistidos::atualizar_status));

    // --- Contribuições ---
    let rotas_contribuicoes = Router::new()
        .route(
            "/",
            get(handlers::contribuicoes::listar).post(handlers::contribuicoes::criar),
        )
        .route("/pendentes", get(handlers::contribuicoes::pendentes))
        .route("/atrasadas", get(handlers::contribuicoes::atrasadas))
        .route("/mes", get(handlers::contribuicoes::do_mes))
        .route("/statistics", get(handlers::contribuicoes::estatisticas))
        .route(
            "/relatorio-inadimplencia",
            get(handlers::contribuicoes::relatorio_inadimplencia),
        )
        .route("/gerar-mensais", post(handlers::contribuicoes::gerar_mensais))
        .route(
            "/marcar-atrasadas",
            post(handlers::contribuicoes::marcar_atrasadas),
        )
        .route(
            "/{id}",
            get(handlers::contribuicoes::buscar)
                .put(handlers::contribuicoes::atualizar)
                .delete(handlers::contribuicoes::excluir),
        )
        .route(
            "/{id}/processar-pagamento",
            post(handlers::contribuicoes::processar_pagamento),
        );

    // --- Movimentações ---
    let rotas_movimentacoes = Router::new()
        .route(
            "/",
            get(handlers::movimentacoes::listar).post(handlers::movimentacoes::criar),
        )
        .route("/resumo", get(handlers::movimentacoes::resumo))
        .route(
            "/relatorio/categoria",
            get(handlers::movimentacoes::relatorio_categoria),
        )
        .route(
            "/relatorio/conta",
            get(handlers::movimentacoes::relatorio_conta),
        )
        .route("/categorias", get(handlers::movimentacoes::categorias))
        .route("/contas", get(handlers::movimentacoes::contas))
        .route("/statistics", get(handlers::movimentacoes::estatisticas))
        .route(
            "/{id}",
            get(handlers::movimentacoes::buscar)
                .put(handlers::movimentacoes::atualizar)
                .delete(handlers::movimentacoes::excluir),
        );

    // --- Notas Fiscais ---
    let rotas_notas_fiscais = Router::new()
        .route(
            "/",
            get(handlers::notas_fiscais::listar).post(handlers::notas_fiscais::criar),
        )
        .route("/statistics", get(handlers::notas_fiscais::estatisticas))
        .route(
            "/contribuicoes-sem-nota",
            get(handlers::notas_fiscais::contribuicoes_sem_nota),
        )
        .route(
            "/relatorio-mensal",
            get(handlers::notas_fiscais::relatorio_mensal),
        )
        .route("/numero/{numero}", get(handlers::notas_fiscais::buscar_por_numero))
        .route("/gerar-lote", post(handlers::notas_fiscais::gerar_lote))
        .route(
            "/{id}",
            get(handlers::notas_fiscais::buscar).put(handlers::notas_fiscais::atualizar),
        )
        .route("/{id}/cancelar", post(handlers::notas_fiscais::cancelar))
        .route("/{id}/gerar-pdf", post(handlers::notas_fiscais::gerar_pdf))
        .route("/{id}/download-pdf", get(handlers::notas_fiscais::baixar_pdf))
        .route(
            "/{id}/reenviar-email",
            post(handlers::notas_fiscais::reenviar_email),
        );

    // --- Emails + Templates ---
    let rotas_emails = Router::new()
        .route("/enviar", post(handlers::emails::enviar))
        .route("/enviar-lote", post(handlers::emails::enviar_lote))
        .route(
            "/processar-agendados",
            post(handlers::emails::processar_agendados),
        )
        .route("/testar-conexao", get(handlers::emails::testar_conexao))
        .route("/logs", get(handlers::emails::logs))
        .route("/{id}/reenviar", post(handlers::emails::reenviar))
        .route(
            "/templates",
            get(handlers::emails::listar_templates).post(handlers::emails::criar_template),
        )
        .route(
            "/templates/tipo/{tipo}",
            get(handlers::emails::templates_por_tipo),
        )
        .route(
            "/templates/{id}",
            get(handlers::emails::buscar_template)
                .put(handlers::emails::atualizar_template)
                .delete(handlers::emails::excluir_template),
        )
        .route(
            "/templates/{id}/ativar",
            post(handlers::emails::ativar_template),
        )
        .route(
            "/templates/{id}/duplicar",
            post(handlers::emails::duplicar_template),
        )
        .route(
            "/templates/{id}/renderizar",
            post(handlers::emails::renderizar_template),
        );

    // --- Relatórios ---
    let rotas_relatorios = Router::new()
        .route("/dashboard", get(handlers::relatorios::dashboard))
        .route(
            "/resumo-financeiro",
            get(handlers::relatorios::resumo_financeiro),
        )
        .route("/metricas-chave", get(handlers::relatorios::metricas_chave))
        .route("/receitas", get(handlers::relatorios::receitas))
        .route("/despesas", get(handlers::relatorios::despesas))
        .route("/contribuicoes", get(handlers::relatorios::contribuicoes))
        .route(
            "/projecao-financeira",
            get(handlers::relatorios::projecao_financeira),
        )
        .route(
            "/comparativo-mensal",
            get(handlers::relatorios::comparativo_mensal),
        )
        .route("/completo", get(handlers::relatorios::completo));

    // --- Super Admin (auth + cargo com acesso global) ---
    let rotas_super_admin = Router::new()
        .route("/dashboard", get(handlers::super_admin::dashboard))
        .route(
            "/usuarios",
            get(handlers::super_admin::listar_usuarios).post(handlers::super_admin::criar_usuario),
        )
        .route(
            "/usuarios/{id}",
            put(handlers::super_admin::atualizar_usuario)
                .delete(handlers::super_admin::excluir_usuario),
        )
        .route(
            "/usuarios/{id}/transferir",
            post(handlers::super_admin::transferir_usuario),
        )
        .route(
            "/assistidos",
            get(handlers::super_admin::listar_assistidos)
                .post(handlers::super_admin::criar_assistido),
        )
        .route(
            "/assistidos/{id}",
            put(handlers::super_admin::atualizar_assistido)
                .delete(handlers::super_admin::excluir_assistido),
        )
        .route(
            "/sedes",
            get(handlers::super_admin::listar_sedes).post(handlers::super_admin::criar_sede),
        )
        .route(
            "/sedes/{id}",
            put(handlers::super_admin::atualizar_sede)
                .delete(handlers::super_admin::excluir_sede),
        )
        .layer(axum_middleware::from_fn(super_admin_guard));

    let protegido = |rotas: Router<AppState>| {
        rotas.layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
    };

    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", rotas_auth)
        .nest("/sedes", protegido(rotas_sedes))
        .nest("/voluntarios", protegido(rotas_voluntarios))
        .nest("/assistidos", protegido(rotas_assistidos))
        .nest("/contribuicoes", protegido(rotas_contribuicoes))
        .nest("/movimentacoes", protegido(rotas_movimentacoes))
        .nest("/notas-fiscais", protegido(rotas_notas_fiscais))
        .nest("/emails", protegido(rotas_emails))
        .nest("/relatorios", protegido(rotas_relatorios))
        .nest("/super-admin", protegido(rotas_super_admin));

    let app = Router::new()
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state.clone());

    let addr = format!("0.0.0.0:{}", config.porta);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .with_graceful_shutdown(sinal_de_encerramento())
        .await
        .expect("Erro no servidor Axum");

    // Encerramento limpo: devolve as conexões do banco antes de sair
    app_state.encerrar().await;
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "API Gerenciador SERFO está funcionando!",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "endpoints": {
            "voluntarios": "/api/v1/voluntarios",
            "assistidos": "/api/v1/assistidos",
            "movimentacoes": "/api/v1/movimentacoes",
            "contribuicoes": "/api/v1/contribuicoes",
            "relatorios": "/api/v1/relatorios",
            "notasFiscais": "/api/v1/notas-fiscais",
            "emails": "/api/v1/emails",
            "sedes": "/api/v1/sedes",
            "superAdmin": "/api/v1/super-admin",
        },
    }))
}

async fn sinal_de_encerramento() {
    tokio::signal::ctrl_c()
        .await
        .expect("Falha ao instalar o handler de Ctrl+C");
    tracing::info!("Sinal de encerramento recebido");
}
