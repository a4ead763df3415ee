use glam::{vec3, vec4, Mat4};
use glint::{Driver, GlShaderProgram, Uniform, UniformType};
use glint_gl::{OpenGLDriver, OpenGLError};

use crate::tests::{fixture, IntegrationTest};

fn assert_no_gl_error(driver: &OpenGLDriver) {
    assert_eq!(OpenGLError::current_error(driver.gl()), None);
}

fn test_distinct_handles(driver: &OpenGLDriver) {
    let first = GlShaderProgram::new(driver, fixture("basic.vert"), fixture("basic.frag"));
    let second = GlShaderProgram::new(driver, fixture("basic.vert"), fixture("basic.frag"));
    assert!(first.is_linked());
    assert!(second.is_linked());
    assert_ne!(first.handle(), second.handle());
    assert_no_gl_error(driver);
}

fn test_missing_file(driver: &OpenGLDriver) {
    let program = GlShaderProgram::new(
        driver,
        fixture("does_not_exist.vert"),
        fixture("basic.frag"),
    );
    assert_eq!(program.handle(), None);
    program.use_program();
    program.set_float("opacity", 1.);
    assert_no_gl_error(driver);
}

fn test_syntax_error(driver: &OpenGLDriver) {
    let program = GlShaderProgram::new(driver, fixture("basic.vert"), fixture("broken.frag"));
    let handle = program.handle().expect("link is attempted after a compile failure");
    assert!(!driver.program_link_status(handle));
    assert!(!driver.program_info_log(handle).trim().is_empty());
}

fn test_uniform_read_back(driver: &OpenGLDriver) {
    let program = GlShaderProgram::new(
        driver,
        fixture("all_types.vert"),
        fixture("all_types.frag"),
    );
    assert!(program.is_linked());
    let transform = Mat4::from_translation(vec3(1., 2., 3.)) * Mat4::from_rotation_z(0.5);

    program.use_program();
    program.set_bool("enabled", true);
    program.set_int("mode", -3);
    program.set_float("opacity", 0.25);
    program.set_vec2("offset", [1f32, -1.]);
    program.set_vec3("color", vec3(0.1, 0.2, 0.3));
    program.set_vec4("tint", vec4(1., 0.5, 0.25, 1.));
    program.set_mat4("transform", transform);
    assert_no_gl_error(driver);

    let handle = program.handle().unwrap();
    let expected = [
        ("enabled", Uniform::Bool(true)),
        ("mode", Uniform::Int(-3)),
        ("opacity", Uniform::Float(0.25)),
        ("offset", Uniform::Vec2([1., -1.])),
        ("color", Uniform::Vec3([0.1, 0.2, 0.3])),
        ("tint", Uniform::Vec4([1., 0.5, 0.25, 1.])),
        ("transform", Uniform::from(transform)),
    ];
    for (name, value) in expected {
        let location = program
            .uniform_location(name)
            .unwrap_or_else(|| panic!("uniform {name} is active"));
        assert_eq!(
            driver.uniform_value(handle, location, value.ty()),
            Some(value),
            "uniform {name}"
        );
    }
}

fn test_unknown_uniform(driver: &OpenGLDriver) {
    let program = GlShaderProgram::new(
        driver,
        fixture("all_types.vert"),
        fixture("all_types.frag"),
    );
    program.use_program();
    assert_eq!(program.uniform_location("does_not_exist"), None);
    program.set_float("does_not_exist", 1.);
    assert_no_gl_error(driver);

    let opacity = program.uniform_location("opacity").unwrap();
    assert_eq!(
        driver.uniform_value(program.handle().unwrap(), opacity, UniformType::Float),
        Some(Uniform::Float(0.))
    );
}

fn test_drop_deletes(driver: &OpenGLDriver) {
    let program = GlShaderProgram::new(driver, fixture("basic.vert"), fixture("basic.frag"));
    let handle = program.handle().unwrap();
    assert!(driver.is_program(handle));
    drop(program);
    assert!(!driver.is_program(handle));
}

inventory::submit!(IntegrationTest {
    name: "Shader program handles are distinct",
    test_fn: test_distinct_handles,
});

inventory::submit!(IntegrationTest {
    name: "Shader program missing file",
    test_fn: test_missing_file,
});

inventory::submit!(IntegrationTest {
    name: "Shader program syntax error",
    test_fn: test_syntax_error,
});

inventory::submit!(IntegrationTest {
    name: "Shader program uniform read back",
    test_fn: test_uniform_read_back,
});

inventory::submit!(IntegrationTest {
    name: "Shader program unknown uniform",
    test_fn: test_unknown_uniform,
});

inventory::submit!(IntegrationTest {
    name: "Shader program deleted on drop",
    test_fn: test_drop_deletes,
});
