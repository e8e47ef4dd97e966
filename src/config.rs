use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        AssistidoRepository, ConfiguracaoRepository, ContribuicaoRepository, EmailRepository,
        MovimentacaoRepository, NotaFiscalRepository, RelatorioRepository, SedeRepository,
        VoluntarioRepository,
    },
    services::{
        AssistidoService, AuthService, ConfiguracaoService, ContribuicaoService, EmailService,
        MovimentacaoService, NotaFiscalService, RelatorioService, SedeService, SuperAdminService,
        TemplateEmailService, VoluntarioService,
        email_service::{TransporteEmail, TransporteTracing},
    },
};

/// Configuração carregada do ambiente na subida do processo.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub porta: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;
        let porta = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Ok(Self {
            database_url,
            jwt_secret,
            porta,
        })
    }
}

/// O estado compartilhado da aplicação: a pool e o grafo de serviços,
/// montado explicitamente aqui — nada de estado global ambiente.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub sede_service: SedeService,
    pub voluntario_service: VoluntarioService,
    pub assistido_service: AssistidoService,
    pub contribuicao_service: ContribuicaoService,
    pub movimentacao_service: MovimentacaoService,
    pub nota_fiscal_service: NotaFiscalService,
    pub relatorio_service: RelatorioService,
    pub template_email_service: TemplateEmailService,
    pub email_service: EmailService,
    pub super_admin_service: SuperAdminService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Repositórios ---
        let sede_repo = SedeRepository::new(db_pool.clone());
        let voluntario_repo = VoluntarioRepository::new(db_pool.clone());
        let assistido_repo = AssistidoRepository::new(db_pool.clone());
        let contribuicao_repo = ContribuicaoRepository::new(db_pool.clone());
        let movimentacao_repo = MovimentacaoRepository::new(db_pool.clone());
        let nota_fiscal_repo = NotaFiscalRepository::new(db_pool.clone());
        let relatorio_repo = RelatorioRepository::new(db_pool.clone());
        let email_repo = EmailRepository::new(db_pool.clone());
        let configuracao_repo = ConfiguracaoRepository::new(db_pool.clone());

        // --- Monta o grafo de dependências ---
        let auth_service = AuthService::new(voluntario_repo.clone(), config.jwt_secret.clone());
        let sede_service = SedeService::new(sede_repo.clone());
        let voluntario_service = VoluntarioService::new(
            voluntario_repo.clone(),
            sede_repo.clone(),
            contribuicao_repo.clone(),
        );
        let assistido_service =
            AssistidoService::new(assistido_repo.clone(), sede_repo.clone());
        let contribuicao_service = ContribuicaoService::new(
            contribuicao_repo.clone(),
            voluntario_repo.clone(),
            assistido_repo.clone(),
            movimentacao_repo.clone(),
            nota_fiscal_repo.clone(),
            db_pool.clone(),
        );
        let movimentacao_service = MovimentacaoService::new(movimentacao_repo.clone());
        let template_email_service = TemplateEmailService::new(email_repo.clone());
        let transporte: Arc<dyn TransporteEmail> = Arc::new(TransporteTracing);
        let email_service = EmailService::new(
            email_repo.clone(),
            template_email_service.clone(),
            transporte,
        );
        let configuracao_service = ConfiguracaoService::new(configuracao_repo);
        let nota_fiscal_service = NotaFiscalService::new(
            nota_fiscal_repo.clone(),
            contribuicao_repo.clone(),
            configuracao_service.clone(),
            email_service.clone(),
            db_pool.clone(),
        );
        let relatorio_service = RelatorioService::new(
            relatorio_repo,
            movimentacao_repo,
            contribuicao_repo,
            assistido_repo.clone(),
        );
        let super_admin_service =
            SuperAdminService::new(voluntario_repo, assistido_repo, sede_repo);

        Ok(Self {
            db_pool,
            auth_service,
            sede_service,
            voluntario_service,
            assistido_service,
            contribuicao_service,
            movimentacao_service,
            nota_fiscal_service,
            relatorio_service,
            template_email_service,
            email_service,
            super_admin_service,
        })
    }

    /// Encerramento explícito: devolve as conexões antes do processo sair.
    pub async fn encerrar(&self) {
        self.db_pool.close().await;
        tracing::info!("Conexões com o banco encerradas");
    }
}
