/// Derives a [`Component`](crate::comp::Component) implementation for the
/// applied type.
///
/// The component's stable identifier is declared through the `#[component]`
/// attribute, which accepts a 32-hex-digit or 8-4-4-4-12 hyphenated UUID in
/// either case:
///
/// ```
/// use archec::Component;
///
/// #[derive(Component)]
/// #[component(uuid = "b2c1a640-3f89-4a7e-9d2b-8f41c0de5a11")]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// assert_eq!(<Position as Component>::NAME, "Position");
/// ```
///
/// # Options
/// Options are applied inside the `#[component(...)]` attribute.
/// Multiple options are separated by commas.
///
/// ## `uuid = "..."` (required)
/// The globally unique identifier of the component type.
/// Two types must never share a UUID;
/// the identifier is how the registry recognizes a type across modules.
///
/// ## `name = "..."`
/// Overrides the debug name recorded in the registry.
/// Defaults to the type identifier.
///
/// ## `archec_as(path)`
/// Overrides the path to the `archec` crate in the generated code,
/// e.g. `archec_as(crate)` when the derive is used from within `archec` itself.
#[doc(inline)]
pub use archec_codegen::Component;
