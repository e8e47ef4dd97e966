pub mod assistido;
pub mod auth;
pub mod configuracao;
pub mod contribuicao;
pub mod email;
pub mod movimentacao;
pub mod nota_fiscal;
pub mod relatorio;
pub mod sede;
pub mod voluntario;

use rust_decimal::Decimal;
use validator::ValidationError;

/// CPF somente com os 11 dígitos, sem máscara.
pub fn validar_cpf(cpf: &str) -> Result<(), ValidationError> {
    if cpf.len() == 11 && cpf.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("cpf_invalido"))
    }
}

pub fn validar_valor_positivo(valor: &Decimal) -> Result<(), ValidationError> {
    if *valor > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("valor_nao_positivo"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_exige_onze_digitos() {
        assert!(validar_cpf("12345678901").is_ok());
        assert!(validar_cpf("1234567890").is_err());
        assert!(validar_cpf("123456789012").is_err());
        assert!(validar_cpf("123.456.789-01").is_err());
    }

    #[test]
    fn valor_deve_ser_maior_que_zero() {
        assert!(validar_valor_positivo(&Decimal::new(1, 2)).is_ok());
        assert!(validar_valor_positivo(&Decimal::ZERO).is_err());
        assert!(validar_valor_positivo(&Decimal::new(-100, 2)).is_err());
    }
}
