use salesboard::{
    config::{Role, RoleRule, default_role_rules},
    resolve::resolve_schema,
};

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn default_rules_pick_date_channel_and_service() {
    let cols = columns(&[
        "DISTRITO",
        "FECHA_VENTA",
        "CANAL_PEDIDO",
        "SERVICIO_SOLICITADO",
    ]);
    let schema = resolve_schema(&cols, &default_role_rules());
    assert_eq!(schema.date.as_deref(), Some("FECHA_VENTA"));
    assert_eq!(schema.channel.as_deref(), Some("CANAL_PEDIDO"));
    assert_eq!(schema.service.as_deref(), Some("SERVICIO_SOLICITADO"));
}

#[test]
fn leftmost_substring_match_wins() {
    let cols = columns(&["FECHA_PEDIDO", "FECHA_ENTREGA", "SUBCANAL", "CANAL"]);
    let schema = resolve_schema(&cols, &default_role_rules());
    assert_eq!(schema.date.as_deref(), Some("FECHA_PEDIDO"));
    assert_eq!(schema.channel.as_deref(), Some("SUBCANAL"));

    let reordered = columns(&["FECHA_ENTREGA", "FECHA_PEDIDO"]);
    let schema = resolve_schema(&reordered, &default_role_rules());
    assert_eq!(schema.date.as_deref(), Some("FECHA_ENTREGA"));
}

#[test]
fn service_requires_exact_name() {
    let cols = columns(&["SERVICIO_SOLICITADO_2", "TIPO_SERVICIO"]);
    let schema = resolve_schema(&cols, &default_role_rules());
    assert_eq!(schema.service, None);
}

#[test]
fn missing_roles_resolve_to_none() {
    let schema = resolve_schema(&columns(&["DISTRITO", "VENDEDOR"]), &default_role_rules());
    assert_eq!(schema.date, None);
    assert_eq!(schema.channel, None);
    assert_eq!(schema.service, None);
    assert_eq!(schema.role_of("DISTRITO"), None);
}

#[test]
fn earlier_rules_take_precedence_for_the_same_role() {
    let rules = vec![
        RoleRule::exact(Role::Date, "FECHA_ENTREGA"),
        RoleRule::contains(Role::Date, "FECHA"),
    ];
    let cols = columns(&["FECHA_PEDIDO", "FECHA_ENTREGA"]);
    let schema = resolve_schema(&cols, &rules);
    assert_eq!(schema.date.as_deref(), Some("FECHA_ENTREGA"));
    assert_eq!(schema.role_of("FECHA_ENTREGA"), Some(Role::Date));

    let fallback = resolve_schema(&columns(&["FECHA_PEDIDO"]), &rules);
    assert_eq!(fallback.date.as_deref(), Some("FECHA_PEDIDO"));
}
