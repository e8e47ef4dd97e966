pub mod assistido_service;
pub use assistido_service::AssistidoService;
pub mod auth;
pub use auth::AuthService;
pub mod configuracao_service;
pub use configuracao_service::ConfiguracaoService;
pub mod contribuicao_service;
pub use contribuicao_service::ContribuicaoService;
pub mod email_service;
pub use email_service::EmailService;
pub mod movimentacao_service;
pub use movimentacao_service::MovimentacaoService;
pub mod nota_fiscal_service;
pub use nota_fiscal_service::NotaFiscalService;
pub mod relatorio_service;
pub use relatorio_service::RelatorioService;
pub mod sede_service;
pub use sede_service::SedeService;
pub mod super_admin_service;
pub use super_admin_service::SuperAdminService;
pub mod template_email_service;
pub use template_email_service::TemplateEmailService;
pub mod voluntario_service;
pub use voluntario_service::VoluntarioService;
