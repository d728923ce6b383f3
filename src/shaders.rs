//! WGSL shader sources for the style materials.

use crate::vertex::RenderStyle;

const UNIFORM_DECLS: &str = "
struct ViewUniforms {
    world_to_view: mat4x4<f32>,
    view_to_ndc: mat4x4<f32>,
    world_to_ndc: mat4x4<f32>,
};

struct ObjectUniforms {
    world: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> view: ViewUniforms;
@group(1) @binding(0) var<uniform> object: ObjectUniforms;
";

/// Flat vertex colour, no lighting. Shared by the two palette styles.
const COLOUR_SHADER: &str = "
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) colour: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) colour: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = view.world_to_ndc * object.world * vec4<f32>(position, 1.0);
    out.colour = colour;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.colour;
}
";

/// Normal visualised as colour.
const NORMAL_SHADER: &str = "
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = view.world_to_ndc * object.world * vec4<f32>(position, 1.0);
    out.normal = normalize((object.world * vec4<f32>(normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(normalize(in.normal) * 0.5 + vec3<f32>(0.5), 1.0);
}
";

/// Palette colour with simple directional shading.
const NORMAL_COLOUR_SHADER: &str = "
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) colour: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) colour: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = view.world_to_ndc * object.world * vec4<f32>(position, 1.0);
    out.normal = normalize((object.world * vec4<f32>(normal, 0.0)).xyz);
    out.colour = colour;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light = normalize(vec3<f32>(0.4, 0.8, 0.3));
    let shade = max(dot(normalize(in.normal), light), 0.0) * 0.8 + 0.2;
    return vec4<f32>(in.colour.rgb * shade, in.colour.a);
}
";

/// Full WGSL source for a style's pipeline.
pub(crate) fn source_for(style: RenderStyle) -> String {
    let body = match style {
        RenderStyle::FaceColour | RenderStyle::TriangleColour => COLOUR_SHADER,
        RenderStyle::Normal => NORMAL_SHADER,
        RenderStyle::NormalColour => NORMAL_COLOUR_SHADER,
    };
    format!("{UNIFORM_DECLS}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_styles_have_entry_points() {
        for style in RenderStyle::ALL {
            let source = source_for(style);
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
            assert!(source.contains("@group(0) @binding(0)"));
            assert!(source.contains("@group(1) @binding(0)"));
        }
    }

    #[test]
    fn test_attribute_locations_match_layouts() {
        for style in RenderStyle::ALL {
            let source = source_for(style);
            for attribute in &style.layout().attributes {
                let marker = format!("@location({})", attribute.shader_location);
                assert!(source.contains(&marker), "{style}: missing {marker}");
            }
        }
    }
}
