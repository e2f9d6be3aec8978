//! Validação de entrada dos relatórios.
//!
//! Fonte única das regras de campos obrigatórios por tipo de relatório.
//! As mensagens são descritivas e trazem sugestão de correção.

use std::fmt;

use chrono::NaiveDate;

use super::models::{
    EvidenciasRelatorio, MonumentosRelatorio, MutiraoRelatorio, RotineirosRelatorio,
};

/// Erro de validação com mensagem amigável.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Campo que falhou na validação
    pub field: String,
    /// Mensagem legível em português
    pub message: String,
    /// Sugestão de como corrigir o erro
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Erro para campo obrigatório vazio
    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} não pode ficar vazio", label)).with_suggestion(format!(
            "Preencha {} com um valor válido",
            label.to_lowercase()
        ))
    }

    /// Erro para data obrigatória ausente
    pub fn missing_date(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} é obrigatória", label))
            .with_suggestion("Informe a data no formato AAAA-MM-DD, exemplo: 2024-01-15")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Coleção de erros de validação com saída formatada.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Mensagem formatada para o corpo da resposta HTTP 400.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validação falhou: {} erro(s) encontrado(s)",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    /// Converte em Result: Ok sem erros, Err com a mensagem formatada.
    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

// ============================================================================
// Funções de validação
// ============================================================================

/// Valida que uma string não é vazia após trim
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Valida que uma data obrigatória foi informada
pub fn validate_data(value: Option<NaiveDate>, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.is_none() {
        errors.add(ValidationError::missing_date(field, label));
    }
}

/// Valida que pelo menos uma das duas datas foi informada
pub fn validate_data_ou_inicio(
    data: Option<NaiveDate>,
    data_inicio: Option<NaiveDate>,
    errors: &mut ValidationErrors,
) {
    if data.is_none() && data_inicio.is_none() {
        errors.add(
            ValidationError::new("data", "Informe `data` ou `dataInicio`")
                .with_suggestion("Relatórios de período usam dataInicio/dataFim; os demais, data"),
        );
    }
}

// ============================================================================
// Regras por tipo de relatório
// ============================================================================

/// Mutirão: data obrigatória e pelo menos uma seção.
pub fn validar_mutirao(rel: &MutiraoRelatorio) -> Result<(), String> {
    let mut errors = ValidationErrors::new();

    validate_data(rel.data, "data", "Data do mutirão", &mut errors);
    if rel.secoes.is_empty() {
        errors.add(
            ValidationError::new("secoes", "O mutirão precisa de pelo menos uma seção")
                .with_suggestion("Inclua as sub-regiões atendidas em `secoes`"),
        );
    }

    errors.into_result()
}

/// Evidências (e registro/unified): tipo de serviço e data ou início de período.
pub fn validar_evidencias(rel: &EvidenciasRelatorio) -> Result<(), String> {
    let mut errors = ValidationErrors::new();

    validate_required(&rel.tipo_servico, "tipoServico", "Tipo de serviço", &mut errors);
    validate_data_ou_inicio(rel.data, rel.data_inicio, &mut errors);

    errors.into_result()
}

/// Rotineiros: data de referência do mês obrigatória.
pub fn validar_rotineiros(rel: &RotineirosRelatorio) -> Result<(), String> {
    let mut errors = ValidationErrors::new();

    validate_data(rel.data, "data", "Data de referência", &mut errors);

    errors.into_result()
}

/// Monumentos: tipo de serviço e data obrigatórios.
pub fn validar_monumentos(rel: &MonumentosRelatorio) -> Result<(), String> {
    let mut errors = ValidationErrors::new();

    validate_required(&rel.tipo_servico, "tipoServico", "Tipo de serviço", &mut errors);
    validate_data(rel.data, "data", "Data da intervenção", &mut errors);

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_empty() {
        let mut errors = ValidationErrors::new();
        validate_required("", "tipoServico", "Tipo de serviço", &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors
            .to_message()
            .contains("Tipo de serviço não pode ficar vazio"));
    }

    #[test]
    fn test_validate_required_valid() {
        let mut errors = ValidationErrors::new();
        validate_required("ZELADORIA", "tipoServico", "Tipo de serviço", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validation_errors_message() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::empty_field("tipoServico", "Tipo de serviço"));
        errors.add(ValidationError::missing_date("data", "Data do mutirão"));

        let msg = errors.to_message();
        assert!(msg.contains("2 erro(s)"));
        assert!(msg.contains("Tipo de serviço não pode ficar vazio"));
        assert!(msg.contains("Data do mutirão é obrigatória"));
    }
}
