use zeladoria_server::relatorio::models::{
    EvidenciasRelatorio, MonumentosRelatorio, MutiraoRelatorio, RotineirosRelatorio,
};
use zeladoria_server::relatorio::validation::{
    validar_evidencias, validar_monumentos, validar_mutirao, validar_rotineiros,
    validate_required, ValidationError, ValidationErrors,
};

fn mutirao(json: &str) -> MutiraoRelatorio {
    serde_json::from_str(json).unwrap()
}

fn evidencias(json: &str) -> EvidenciasRelatorio {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_mutirao_valido() {
    let rel = mutirao(r#"{ "data": "2024-03-10", "secoes": [{ "sub": "ST" }] }"#);
    assert!(validar_mutirao(&rel).is_ok());
}

#[test]
fn test_mutirao_sem_data() {
    let rel = mutirao(r#"{ "secoes": [{ "sub": "ST" }] }"#);
    let erro = validar_mutirao(&rel).unwrap_err();
    assert!(erro.contains("Data do mutirão é obrigatória"));
}

#[test]
fn test_mutirao_sem_secoes() {
    let rel = mutirao(r#"{ "data": "2024-03-10" }"#);
    let erro = validar_mutirao(&rel).unwrap_err();
    assert!(erro.contains("pelo menos uma seção"));
}

#[test]
fn test_evidencias_aceita_data_ou_data_inicio() {
    let com_data = evidencias(r#"{ "tipoServico": "X", "data": "2024-01-15" }"#);
    assert!(validar_evidencias(&com_data).is_ok());

    let com_inicio = evidencias(r#"{ "tipoServico": "X", "dataInicio": "2024-01-01" }"#);
    assert!(validar_evidencias(&com_inicio).is_ok());
}

#[test]
fn test_evidencias_sem_nenhuma_data() {
    let rel = evidencias(r#"{ "tipoServico": "X" }"#);
    let erro = validar_evidencias(&rel).unwrap_err();
    assert!(erro.contains("`data` ou `dataInicio`"));
}

#[test]
fn test_evidencias_sem_tipo_servico() {
    let rel = evidencias(r#"{ "data": "2024-01-15" }"#);
    let erro = validar_evidencias(&rel).unwrap_err();
    assert!(erro.contains("Tipo de serviço"));
}

#[test]
fn test_evidencias_acumula_erros() {
    let rel = evidencias(r#"{}"#);
    let erro = validar_evidencias(&rel).unwrap_err();
    assert!(erro.contains("2 erro(s)"));
}

#[test]
fn test_rotineiros_exige_data() {
    let sem_data: RotineirosRelatorio = serde_json::from_str(r#"{ "servicos": [] }"#).unwrap();
    assert!(validar_rotineiros(&sem_data).is_err());

    let com_data: RotineirosRelatorio =
        serde_json::from_str(r#"{ "data": "2025-08-01" }"#).unwrap();
    assert!(validar_rotineiros(&com_data).is_ok());
}

#[test]
fn test_monumentos_exige_tipo_servico_e_data() {
    let completo: MonumentosRelatorio =
        serde_json::from_str(r#"{ "tipoServico": "X", "data": "2024-01-15" }"#).unwrap();
    assert!(validar_monumentos(&completo).is_ok());

    let sem_data: MonumentosRelatorio =
        serde_json::from_str(r#"{ "tipoServico": "X" }"#).unwrap();
    assert!(validar_monumentos(&sem_data).is_err());

    let sem_servico: MonumentosRelatorio =
        serde_json::from_str(r#"{ "data": "2024-01-15" }"#).unwrap();
    assert!(validar_monumentos(&sem_servico).is_err());
}

#[test]
fn test_mensagem_traz_sugestao() {
    let mut errors = ValidationErrors::new();
    errors.add(ValidationError::missing_date("data", "Data do mutirão"));
    let msg = errors.to_message();
    assert!(msg.contains("AAAA-MM-DD"));
}

#[test]
fn test_validate_required_com_espacos() {
    let mut errors = ValidationErrors::new();
    validate_required("   ", "tipoServico", "Tipo de serviço", &mut errors);
    assert_eq!(errors.len(), 1);
}
