pub mod assistidos;
pub mod auth;
pub mod contribuicoes;
pub mod emails;
pub mod movimentacoes;
pub mod notas_fiscais;
pub mod relatorios;
pub mod sedes;
pub mod super_admin;
pub mod voluntarios;
