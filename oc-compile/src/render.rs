//! Turning an assembled [`RenderContext`] into device text.
//!
//! [`BuiltinRenderer`] knows the three dialect layouts by name (`eos`,
//! `junos`, `sonic`). [`TeraRenderer`] loads user templates from a directory,
//! one `<name>.tera` file per template, and exposes the context fields
//! (`vendor`, `asn`, `vrf`, `router`, `families`, `policy`) to them.

use std::fs;
use std::path::Path;

use tera::{Context, Tera};
use tracing::debug;

use crate::assemble::RenderContext;
use crate::error::CompileError;

pub trait TemplateRenderer {
    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, CompileError>;
}

/// Fixed layouts for the supported dialects.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRenderer;

impl TemplateRenderer for BuiltinRenderer {
    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, CompileError> {
        let lines = match template {
            "eos" => eos_layout(ctx)?,
            "junos" => junos_layout(ctx),
            "sonic" => sonic_layout(ctx)?,
            other => {
                return Err(CompileError::Render(format!(
                    "no builtin template named '{other}'"
                )))
            }
        };
        Ok(lines.join("\n"))
    }
}

fn require_asn(ctx: &RenderContext) -> Result<u32, CompileError> {
    ctx.asn.ok_or_else(|| {
        CompileError::Render(format!(
            "{} router block needs an AS number",
            ctx.vendor
        ))
    })
}

fn indented<'a>(indent: &'a str, lines: &'a [String]) -> impl Iterator<Item = String> + 'a {
    lines.iter().map(move |line| format!("{indent}{line}"))
}

fn eos_layout(ctx: &RenderContext) -> Result<Vec<String>, CompileError> {
    let mut out = Vec::new();
    if ctx.has_router_content() {
        out.push(format!("router bgp {}", require_asn(ctx)?));
        let body = if ctx.vrf.is_empty() {
            "   ".to_string()
        } else {
            out.push(format!("   vrf {}", ctx.vrf));
            "      ".to_string()
        };
        out.extend(indented(&body, &ctx.router));
        for family in &ctx.families {
            out.push(format!("{body}address-family {}", family.alias));
            let nested = format!("{body}   ");
            out.extend(indented(&nested, &family.lines));
        }
    }
    out.extend(ctx.policy.iter().cloned());
    Ok(out)
}

fn junos_layout(ctx: &RenderContext) -> Vec<String> {
    ctx.router
        .iter()
        .chain(ctx.families.iter().flat_map(|family| &family.lines))
        .chain(&ctx.policy)
        .cloned()
        .collect()
}

fn sonic_layout(ctx: &RenderContext) -> Result<Vec<String>, CompileError> {
    let mut out = Vec::new();
    if ctx.has_router_content() {
        let asn = require_asn(ctx)?;
        out.push(if ctx.vrf.is_empty() {
            format!("router bgp {asn}")
        } else {
            format!("router bgp {asn} vrf {}", ctx.vrf)
        });
        out.extend(indented(" ", &ctx.router));
        for family in &ctx.families {
            out.push(format!(" address-family {}", family.alias));
            out.extend(indented("  ", &family.lines));
            out.push(" exit-address-family".to_string());
        }
        out.push("exit".to_string());
    }
    out.extend(ctx.policy.iter().cloned());
    Ok(out)
}

/// Templates read from `<dir>/*.tera`, named by file stem.
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn from_dir(dir: &Path) -> Result<Self, CompileError> {
        let read_err = |e: std::io::Error| {
            CompileError::Render(format!("failed to read templates in {}: {e}", dir.display()))
        };

        let mut tera = Tera::default();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("tera") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path).map_err(read_err)?;
            tera.add_raw_template(name, &content)
                .map_err(|e| CompileError::Render(format!("{}: {e}", path.display())))?;
            debug!(template = name, "loaded template");
        }
        Ok(Self { tera })
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, CompileError> {
        let context =
            Context::from_serialize(ctx).map_err(|e| CompileError::Render(e.to_string()))?;
        self.tera
            .render(template, &context)
            .map_err(|e| CompileError::Render(format!("{template}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::FamilySection;
    use pretty_assertions::assert_eq;

    fn context(vendor: &str, vrf: &str, alias: &str) -> RenderContext {
        RenderContext {
            vendor: vendor.to_string(),
            asn: Some(65000),
            vrf: vrf.to_string(),
            router: vec!["router-line".to_string()],
            families: vec![FamilySection {
                name: "IPV4_UNICAST".to_string(),
                alias: alias.to_string(),
                lines: vec!["family-line".to_string()],
            }],
            policy: vec!["policy-line".to_string()],
        }
    }

    #[test]
    fn eos_layout_without_vrf() {
        let text = BuiltinRenderer
            .render("eos", &context("eos", "", "ipv4"))
            .expect("render");
        assert_eq!(
            text,
            "router bgp 65000\n   router-line\n   address-family ipv4\n      family-line\npolicy-line"
        );
    }

    #[test]
    fn eos_layout_nests_under_vrf() {
        let text = BuiltinRenderer
            .render("eos", &context("eos", "RED", "ipv4"))
            .expect("render");
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "router bgp 65000",
                "   vrf RED",
                "      router-line",
                "      address-family ipv4",
                "         family-line",
                "policy-line",
            ]
        );
    }

    #[test]
    fn sonic_layout_closes_blocks() {
        let text = BuiltinRenderer
            .render("sonic", &context("sonic", "RED", "ipv4 unicast"))
            .expect("render");
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "router bgp 65000 vrf RED",
                " router-line",
                " address-family ipv4 unicast",
                "  family-line",
                " exit-address-family",
                "exit",
                "policy-line",
            ]
        );
    }

    #[test]
    fn junos_layout_is_flat() {
        let mut ctx = context("junos", "", "inet");
        ctx.asn = None;
        let text = BuiltinRenderer.render("junos", &ctx).expect("render");
        assert_eq!(text, "router-line\nfamily-line\npolicy-line");
    }

    #[test]
    fn policy_only_output_has_no_router_block() {
        let mut ctx = context("eos", "", "ipv4");
        ctx.asn = None;
        ctx.router.clear();
        ctx.families.clear();
        let text = BuiltinRenderer.render("eos", &ctx).expect("render");
        assert_eq!(text, "policy-line");
    }

    #[test]
    fn missing_asn_with_router_content_fails() {
        let mut ctx = context("sonic", "", "ipv4 unicast");
        ctx.asn = None;
        let err = BuiltinRenderer.render("sonic", &ctx).unwrap_err();
        assert!(matches!(err, CompileError::Render(_)));
    }

    #[test]
    fn tera_templates_are_loaded_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("custom.tera"),
            "asn={{ asn }}\n{% for line in router %}{{ line }}\n{% endfor %}",
        )
        .expect("write template");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let renderer = TeraRenderer::from_dir(dir.path()).expect("load");
        let text = renderer
            .render("custom", &context("eos", "", "ipv4"))
            .expect("render");
        assert_eq!(text, "asn=65000\nrouter-line\n");
        assert!(renderer.render("missing", &context("eos", "", "ipv4")).is_err());
    }
}
