//! Schema lowering engine.
//!
//! Converts a root schema into a [`GenSchema`] tree, inventing named
//! top-level definitions for anonymous nested objects, tuples, and deep map
//! values. Lowering is a serial, deterministic walk: properties are visited
//! in sorted order, invented names are a pure function of the lifting site,
//! and lifted definitions accumulate in insertion order.
//!
//! The input document is never mutated structurally, with one exception:
//! invented definitions are inserted into its definitions table so that the
//! references written in their place resolve on the next lookup.

pub mod types;

pub use types::{GenDefinition, GenSchema, SharedValidations};

use indexmap::IndexMap;

use crate::errors::{GenError, GenResult};
use crate::naming::to_go_name;
use crate::resolver::{ResolvedType, TypeResolver};
use crate::spec::{ref_basename, BoolOrSchema, Document, Items, Schema};

/// Lower one named definition from the document.
pub fn lower_definition(doc: &mut Document, name: &str, package: &str) -> GenResult<GenDefinition> {
    let schema = doc
        .definitions()
        .get(name)
        .cloned()
        .ok_or_else(|| GenError::ModelNotFound { name: name.to_string() })?;

    let mut engine = Lowering::new(doc, TypeResolver::new("", name));
    let gen = engine.make_gen_schema(GenContext::named_root(name, schema))?;

    let mut default_imports = Vec::new();
    if gen.validations.has_validations {
        default_imports = vec![
            "github.com/go-openapi/errors".to_string(),
            "github.com/go-openapi/strfmt".to_string(),
            "github.com/go-openapi/validate".to_string(),
        ];
    } else if uses_strfmt(&gen) || engine.extra_schemas.values().any(uses_strfmt) {
        default_imports = vec!["github.com/go-openapi/strfmt".to_string()];
    }

    Ok(GenDefinition {
        schema: gen,
        package: package
            .rsplit('/')
            .next()
            .unwrap_or(package)
            .to_string(),
        default_imports,
        extra_schemas: engine.extra_schemas.into_values().collect(),
        depends_on: engine.dependencies,
    })
}

/// Lower an inline schema (a body parameter or response payload) against a
/// models package. The schema is treated as anonymous: references resolve to
/// `<models_package>.<Name>` instead of embedding.
pub fn lower_inline(
    doc: &mut Document,
    models_package: &str,
    name: &str,
    schema: Schema,
) -> GenResult<(GenSchema, Vec<GenSchema>)> {
    let mut engine = Lowering::new(doc, TypeResolver::new(models_package, name));
    let mut ctx = GenContext::named_root(name, schema);
    ctx.named = false;
    ctx.receiver = "o".to_string();
    ctx.value_expr = "o".to_string();
    let gen = engine.make_gen_schema(ctx)?;
    Ok((gen, engine.extra_schemas.into_values().collect()))
}

fn uses_strfmt(gen: &GenSchema) -> bool {
    if gen.resolved.go_type.contains("strfmt.") {
        return true;
    }
    gen.items.as_deref().is_some_and(uses_strfmt)
        || gen.additional_items.as_deref().is_some_and(uses_strfmt)
        || gen.additional_properties.as_deref().is_some_and(uses_strfmt)
        || gen.properties.iter().any(uses_strfmt)
        || gen.all_of.iter().any(uses_strfmt)
}

/// Traversal state for one schema node.
#[derive(Debug, Clone)]
struct GenContext {
    path: String,
    name: String,
    suffix: &'static str,
    receiver: String,
    index_var: String,
    key_var: String,
    value_expr: String,
    schema: Schema,
    required: bool,
    named: bool,
    untyped: bool,
    index: usize,
}

fn quote(s: &str) -> String {
    format!("{:?}", s)
}

impl GenContext {
    fn named_root(name: &str, schema: Schema) -> Self {
        GenContext {
            path: String::new(),
            name: name.to_string(),
            suffix: "",
            receiver: "m".to_string(),
            index_var: "i".to_string(),
            key_var: String::new(),
            value_expr: "m".to_string(),
            schema,
            required: false,
            named: true,
            untyped: false,
            index: 0,
        }
    }

    /// Clone for a child node: children are anonymous until proven named.
    fn shallow(&self) -> Self {
        let mut child = self.clone();
        child.named = false;
        child.untyped = false;
        child.suffix = "";
        child.index = 0;
        child
    }

    /// Where an error in this node should point.
    fn error_location(&self) -> String {
        if self.path.is_empty() {
            quote(&self.name)
        } else {
            self.path.clone()
        }
    }

    fn struct_branch(&self, name: &str, schema: Schema) -> Self {
        let mut child = self.shallow();
        child.path = if self.path.is_empty() {
            quote(name)
        } else {
            format!("{}+\".\"+{}", self.path, quote(name))
        };
        child.name = name.to_string();
        child.value_expr = format!("{}.{}", self.value_expr, to_go_name(name));
        child.required = self.schema.required.iter().any(|r| r == name);
        child.schema = schema;
        child
    }

    fn slice_branch(&self, schema: Schema) -> Self {
        let mut child = self.shallow();
        let index_var = self.index_var.clone();
        child.path = if self.path.is_empty() {
            format!("strconv.Itoa({})", index_var)
        } else {
            format!("{}+ \".\" + strconv.Itoa({})", self.path, index_var)
        };
        child.index_var = format!("{}i", index_var);
        child.value_expr = format!("{}[{}]", self.value_expr, index_var);
        child.required = false;
        child.schema = schema;
        child
    }

    fn tuple_element(&self, schema: Schema, index: usize) -> Self {
        let mut child = self.shallow();
        child.path = if self.path.is_empty() {
            quote(&index.to_string())
        } else {
            format!("{}+ \".\"+\"{}\"", self.path, index)
        };
        child.value_expr = format!("{}.P{}", self.value_expr, index);
        child.required = true;
        child.schema = schema;
        child
    }

    fn composition_branch(&self, schema: Schema, index: usize, model_name: &str) -> Self {
        let mut child = self.shallow();
        child.name = if self.name == model_name {
            format!("AO{}", index)
        } else {
            format!("{}AO{}", self.name, index)
        };
        child.index = index;
        child.schema = schema;
        child
    }

    fn additional_property(&self, schema: Schema) -> Self {
        let mut child = self.shallow();
        child.key_var = format!("{}k", self.key_var);
        child.value_expr = format!("{}[{}]", self.value_expr, child.key_var);
        child.path = if self.path.is_empty() {
            child.key_var.clone()
        } else {
            format!("{}+\".\"+{}", self.path, child.key_var)
        };
        child.suffix = "Value";
        child.schema = schema;
        child
    }

    fn additional_items_branch(&self, schema: Schema, tuple_len: usize) -> Self {
        let mut child = self.shallow();
        let index_var = self.index_var.clone();
        let offset = if tuple_len > 0 {
            format!("+{}", tuple_len)
        } else {
            String::new()
        };
        child.name = format!("{} items", self.name);
        child.path = if self.path.is_empty() {
            format!("strconv.Itoa({}{})", index_var, offset)
        } else {
            format!("{}+ \".\" + strconv.Itoa({}{})", self.path, index_var, offset)
        };
        child.value_expr = format!(
            "{}.{}Items[{}]",
            self.value_expr,
            to_go_name(&self.name),
            index_var
        );
        child.required = false;
        child.schema = schema;
        child
    }
}

/// Propagate the monotone validation bit from a child to its container.
fn absorb(gen: &mut GenSchema, child: &GenSchema) {
    if child.validations.has_validations {
        gen.validations.has_validations = true;
    }
    if child
        .additional_properties
        .as_ref()
        .is_some_and(|ap| ap.validations.has_validations)
    {
        gen.validations.has_validations = true;
    }
}

struct Lowering<'d> {
    doc: &'d mut Document,
    resolver: TypeResolver,
    extra_schemas: IndexMap<String, GenSchema>,
    dependencies: Vec<String>,
}

impl<'d> Lowering<'d> {
    fn new(doc: &'d mut Document, resolver: TypeResolver) -> Self {
        Lowering {
            doc,
            resolver,
            extra_schemas: IndexMap::new(),
            dependencies: Vec::new(),
        }
    }

    fn resolve_ctx(&self, ctx: &GenContext) -> GenResult<ResolvedType> {
        let schema = if ctx.untyped { None } else { Some(&ctx.schema) };
        self.resolver
            .resolve(self.doc, schema, !ctx.named)
            .map_err(|e| e.at(&ctx.error_location()))
    }

    fn make_gen_schema(&mut self, mut ctx: GenContext) -> GenResult<GenSchema> {
        let mut gen = self.stamp(&ctx);
        self.record_dependency(&ctx);

        if let Some(done) = self.short_circuit_named_ref(&ctx, &gen)? {
            return Ok(done);
        }

        let nullable_override = self.lift_special_all_of(&mut ctx)?;
        // lifting may have put a reference where the allOf was
        self.record_dependency(&ctx);
        self.build_all_of(&ctx, &mut gen)?;

        let mut tpe = self.resolve_ctx(&ctx)?;
        tpe.is_nullable = tpe.is_nullable || nullable_override;
        gen.resolved = tpe;

        if let Some(replacement) = self.build_additional_properties(&mut ctx, &mut gen)? {
            return Ok(replacement);
        }

        // additional-properties handling may rewrite the schema and with it
        // the kind classification; the flags decided above win
        let prev_complex = gen.resolved.is_complex_object;
        let prev_map = gen.resolved.is_map;
        let prev_additional = gen.is_additional_properties;
        let mut tpe = self.resolve_ctx(&ctx)?;
        tpe.is_nullable = tpe.is_nullable || nullable_override;
        gen.resolved = tpe;
        gen.resolved.is_complex_object = prev_complex;
        gen.resolved.is_map = prev_map;
        gen.is_additional_properties = prev_additional;

        self.build_properties(&mut ctx, &mut gen)?;
        self.build_xml_name(&ctx, &mut gen);
        self.build_additional_items(&mut ctx, &mut gen)?;
        if let Some(replacement) = self.build_items(&mut ctx, &mut gen)? {
            return Ok(replacement);
        }

        Ok(gen)
    }

    fn stamp(&self, ctx: &GenContext) -> GenSchema {
        let schema = &ctx.schema;
        let mut gen = GenSchema {
            name: ctx.name.clone(),
            suffix: ctx.suffix.to_string(),
            path: ctx.path.clone(),
            value_expression: ctx.value_expr.clone(),
            index_var: ctx.index_var.clone(),
            key_var: ctx.key_var.clone(),
            location: "body".to_string(),
            receiver_name: ctx.receiver.clone(),
            title: schema.title.clone().unwrap_or_default(),
            description: schema.description.clone().unwrap_or_default(),
            example: schema.example.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            read_only: schema.read_only,
            ..Default::default()
        };
        gen.validations = self.shared_validations(ctx);
        gen
    }

    fn shared_validations(&self, ctx: &GenContext) -> SharedValidations {
        let schema = &ctx.schema;
        // a default or readOnly value satisfies required on its own
        let required = ctx.required && schema.default.is_none() && !schema.read_only;
        let has_number_validation =
            schema.maximum.is_some() || schema.minimum.is_some() || schema.multiple_of.is_some();
        let has_string_validation =
            schema.max_length.is_some() || schema.min_length.is_some() || schema.pattern.is_some();
        let has_slice_validations =
            schema.max_items.is_some() || schema.min_items.is_some() || schema.unique_items;
        let has_validations = required
            || has_number_validation
            || has_string_validation
            || has_slice_validations
            || !schema.enum_values.is_empty();

        SharedValidations {
            required,
            maximum: schema.maximum,
            exclusive_maximum: schema.exclusive_maximum,
            minimum: schema.minimum,
            exclusive_minimum: schema.exclusive_minimum,
            max_length: schema.max_length,
            min_length: schema.min_length,
            pattern: schema.pattern.clone(),
            multiple_of: schema.multiple_of,
            enum_values: schema.enum_values.clone(),
            items_enum: Vec::new(),
            max_items: schema.max_items,
            min_items: schema.min_items,
            unique_items: schema.unique_items,
            has_validations,
            has_slice_validations,
        }
    }

    fn record_dependency(&mut self, ctx: &GenContext) {
        if let Some(reference) = &ctx.schema.reference {
            let base = ref_basename(reference).to_string();
            if base != self.resolver.model_name
                && !self.extra_schemas.contains_key(&base)
                && !self.dependencies.contains(&base)
            {
                self.dependencies.push(base);
            }
        }
    }

    /// A named schema whose body is a ref embeds the referenced type, so
    /// `Pet: {$ref: Animal}` yields `type Pet struct { Animal }` and stays a
    /// distinct type. When the target is a primitive a struct makes no
    /// sense; the ref becomes a type alias instead.
    fn short_circuit_named_ref(
        &mut self,
        ctx: &GenContext,
        gen: &GenSchema,
    ) -> GenResult<Option<GenSchema>> {
        if !ctx.named || ctx.schema.reference.is_none() {
            return Ok(None);
        }
        let mut gen = gen.clone();
        let nullable_override = gen.resolved.is_nullable;

        let referenced = self
            .resolver
            .resolve(self.doc, Some(&ctx.schema), true)
            .map_err(|e| e.at(&ctx.error_location()))?;
        if referenced.is_primitive {
            gen.resolved = referenced;
            gen.resolved.is_anonymous = false;
            gen.resolved.is_nullable = gen.resolved.is_nullable || nullable_override;
            return Ok(Some(gen));
        }

        let tpe = ResolvedType {
            go_type: if self.resolver.models_package.is_empty() {
                to_go_name(&ctx.name)
            } else {
                self.resolver.prefixed(&to_go_name(&self.resolver.model_name))
            },
            swagger_type: "object".to_string(),
            is_complex_object: true,
            ..Default::default()
        };

        let item_ctx = ctx.composition_branch(ctx.schema.clone(), 0, &self.resolver.model_name);
        let item = self.make_gen_schema(item_ctx)?;
        gen.resolved = tpe;
        gen.resolved.is_nullable = nullable_override;
        absorb(&mut gen, &item);
        gen.all_of.push(item);
        Ok(Some(gen))
    }

    /// An `allOf` with a single substantive member (the rest being bare
    /// nullability markers) collapses to that member, keeping the
    /// accumulated nullability.
    fn lift_special_all_of(&mut self, ctx: &mut GenContext) -> GenResult<bool> {
        if ctx.schema.all_of.is_empty() {
            return Ok(false);
        }
        let mut seen_substantive = 0;
        let mut seen_nullable = false;
        let mut to_lift: Option<Schema> = None;

        for member in &ctx.schema.all_of {
            let tpe = self
                .resolver
                .resolve(self.doc, Some(member), true)
                .map_err(|e| e.at(&ctx.error_location()))?;
            if member.x_is_nullable() {
                seen_nullable = true;
            }
            if member.is_substantive() {
                seen_substantive += 1;
                if (!tpe.is_anonymous && tpe.is_complex_object) || tpe.is_primitive {
                    to_lift = Some(member.clone());
                }
            }
        }

        if seen_substantive == 1 {
            if let Some(lifted) = to_lift {
                ctx.schema = lifted;
                return Ok(seen_nullable);
            }
        }
        Ok(false)
    }

    fn build_all_of(&mut self, ctx: &GenContext, gen: &mut GenSchema) -> GenResult<()> {
        let members = ctx.schema.all_of.clone();
        for (index, member) in members.into_iter().enumerate() {
            let branch = ctx.composition_branch(member, index, &self.resolver.model_name);
            let child = self.make_gen_schema(branch)?;
            absorb(gen, &child);
            gen.all_of.push(child);
        }
        Ok(())
    }

    /// Additional properties: named maps descend through arbitrarily deep
    /// map-of-map layers, lifting anonymous value objects on the way down;
    /// anonymous objects that also declare additional properties are lifted
    /// wholesale and replaced by a ref.
    fn build_additional_properties(
        &mut self,
        ctx: &mut GenContext,
        gen: &mut GenSchema,
    ) -> GenResult<Option<GenSchema>> {
        let Some(additional) = ctx.schema.additional_properties.clone() else {
            return Ok(None);
        };
        let wants = additional.wants();
        gen.has_additional_properties = wants;
        if !wants {
            return Ok(None);
        }

        // an object with declared properties that also allows additional
        // ones is its own kind, neither plain struct nor plain map
        if gen.resolved.is_complex_object {
            gen.is_additional_properties = true;
            gen.resolved.is_complex_object = false;
            gen.resolved.is_map = false;
        }

        let Some(value_schema) = additional.schema().cloned() else {
            return Ok(None);
        };

        if !gen.resolved.is_map && gen.is_additional_properties && ctx.named {
            // named struct-with-map: map lookups go through the property
            // accessor so generated code still compiles
            gen.value_expression = format!("{}.{}", gen.value_expression, to_go_name(&gen.name));
            let child = self.make_gen_schema(ctx.additional_property(value_schema))?;
            absorb(gen, &child);
            gen.additional_properties = Some(Box::new(child));
            return Ok(None);
        }

        if gen.resolved.is_map {
            let mut value_schema = value_schema;
            let tpe = self
                .resolver
                .resolve(self.doc, Some(&value_schema), true)
                .map_err(|e| e.at(&ctx.error_location()))?;
            if tpe.is_complex_object && tpe.is_anonymous {
                let (name, lifted) = self.lift_struct(
                    ctx,
                    &format!("{} Anon", ctx.name),
                    value_schema.clone(),
                    String::new(),
                )?;
                absorb(gen, &lifted);
                value_schema = Schema::reference_to(&name);
            }
            ctx.schema.additional_properties = Some(Box::new(BoolOrSchema::Schema(Box::new(
                value_schema.clone(),
            ))));
            let child = self.make_gen_schema(ctx.additional_property(value_schema))?;
            absorb(gen, &child);
            gen.additional_properties = Some(Box::new(child));
            return Ok(None);
        }

        if gen.is_additional_properties && !ctx.named {
            // anonymous object with additional properties: build the new
            // definition first, then redo this node as a ref to it
            let raw = format!("{} P{}", gen.name, ctx.index);
            let (name, lifted) = self.lift_struct(ctx, &raw, ctx.schema.clone(), String::new())?;
            ctx.schema = Schema::reference_to(&name);
            let mut replacement = self.make_gen_schema(ctx.clone())?;
            if lifted.validations.has_validations {
                replacement.validations.has_validations = true;
            }
            return Ok(Some(replacement));
        }
        Ok(None)
    }

    fn build_properties(&mut self, ctx: &mut GenContext, gen: &mut GenSchema) -> GenResult<()> {
        if ctx.schema.properties.is_empty() {
            return Ok(());
        }
        let mut keys: Vec<String> = ctx.schema.properties.keys().cloned().collect();
        keys.sort();

        for key in keys {
            let property = ctx.schema.properties.get(&key).cloned().unwrap_or_default();
            let tpe = self
                .resolver
                .resolve(self.doc, Some(&property), true)
                .map_err(|e| e.at(&ctx.error_location()))?;

            let mut property_schema = property.clone();
            let mut lifted_has_validations = false;
            if tpe.is_complex_object && tpe.is_anonymous && !property.properties.is_empty() {
                let path = if ctx.path.is_empty() {
                    quote(&key)
                } else {
                    format!("{}+ \".\"+{}", ctx.path, quote(&key))
                };
                let raw = format!("{}{}", ctx.name, to_go_name(&key));
                let (name, lifted) = self.lift_struct(ctx, &raw, property, path)?;
                lifted_has_validations = lifted.validations.has_validations;
                absorb(gen, &lifted);
                property_schema = Schema::reference_to(&name);
            }

            let branch = ctx.struct_branch(&key, property_schema);
            let mut child = self.make_gen_schema(branch)?;
            if lifted_has_validations {
                child.validations.has_validations = true;
            }
            absorb(gen, &child);
            gen.properties.push(child);
        }
        gen.properties.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    fn build_xml_name(&self, ctx: &GenContext, gen: &mut GenSchema) {
        let Some(xml) = &ctx.schema.xml else { return };
        gen.xml_name = ctx.name.clone();
        if let Some(name) = xml.name.as_deref().filter(|n| !n.is_empty()) {
            gen.xml_name = name.to_string();
            if xml.attribute {
                gen.xml_name.push_str(",attr");
            }
        }
    }

    fn build_additional_items(&mut self, ctx: &mut GenContext, gen: &mut GenSchema) -> GenResult<()> {
        let Some(additional) = ctx.schema.additional_items.clone() else {
            return Ok(());
        };
        let wants = additional.wants();
        gen.resolved.has_additional_items = wants;
        if !wants {
            return Ok(());
        }

        let mut item_schema = additional.schema().cloned();
        let tpe = self
            .resolver
            .resolve(self.doc, item_schema.as_ref(), true)
            .map_err(|e| e.at(&ctx.error_location()))?;
        if tpe.is_complex_object && tpe.is_anonymous {
            let schema = item_schema.clone().unwrap_or_default();
            let (name, mut lifted) =
                self.lift_struct(ctx, &format!("{} Items", ctx.name), schema, String::new())?;
            lifted.validations.has_validations = true;
            self.extra_schemas.insert(name.clone(), lifted.clone());
            absorb(gen, &lifted);
            let reference = Schema::reference_to(&name);
            ctx.schema.additional_items =
                Some(Box::new(BoolOrSchema::Schema(Box::new(reference.clone()))));
            item_schema = Some(reference);
        }

        let tuple_len = ctx.schema.tuple_items().map(<[Schema]>::len).unwrap_or(0);
        let mut branch = ctx.additional_items_branch(item_schema.unwrap_or_default(), tuple_len);
        if tpe.is_interface {
            branch.untyped = true;
        }
        let child = self.make_gen_schema(branch)?;
        absorb(gen, &child);
        gen.additional_items = Some(Box::new(child));
        Ok(())
    }

    fn build_items(
        &mut self,
        ctx: &mut GenContext,
        gen: &mut GenSchema,
    ) -> GenResult<Option<GenSchema>> {
        let presents_as_single = ctx.schema.single_items().is_some();
        if presents_as_single && ctx.schema.additional_items.is_some() {
            return Err(GenError::InvalidCombination {
                name: ctx.name.clone(),
                message: "an array with a single item schema cannot declare additionalItems"
                    .to_string(),
                location: ctx.error_location(),
            });
        }
        if presents_as_single {
            return self.build_array(ctx, gen);
        }
        let Some(members) = ctx.schema.tuple_items().map(<[Schema]>::to_vec) else {
            return Ok(None);
        };

        if ctx.named {
            gen.name = ctx.name.clone();
            gen.resolved.go_type = self.resolver.prefixed(&to_go_name(&ctx.name));
            for (index, member) in members.into_iter().enumerate() {
                let branch = ctx.tuple_element(member, index);
                let mut element = self.make_gen_schema(branch)?;
                absorb(gen, &element);
                element.name = format!("P{}", index);
                gen.properties.push(element);
            }
            return Ok(None);
        }

        // anonymous tuple: synthesise a struct, lift it, redo as a ref
        let mut synthetic = Schema::object();
        for (index, member) in members.into_iter().enumerate() {
            synthetic.required.push(format!("P{}", index));
            synthetic.properties.insert(format!("P{}", index), member);
        }
        synthetic.additional_items = ctx.schema.additional_items.clone();

        let raw = format!("{}Tuple{}", gen.name, ctx.index);
        let (name, mut tuple) = self.lift_struct(ctx, &raw, synthetic, String::new())?;
        tuple.resolved.is_tuple = true;
        tuple.resolved.is_complex_object = false;
        tuple.title = format!("{} is a tuple type", name);
        tuple.description = String::new();
        self.extra_schemas.insert(name.clone(), tuple.clone());

        ctx.schema = Schema::reference_to(&name);
        let mut replacement = self.make_gen_schema(ctx.clone())?;
        if tuple.validations.has_validations {
            replacement.validations.has_validations = true;
        }
        Ok(Some(replacement))
    }

    fn build_array(
        &mut self,
        ctx: &mut GenContext,
        gen: &mut GenSchema,
    ) -> GenResult<Option<GenSchema>> {
        let Some(inner) = ctx.schema.single_items().cloned() else {
            return Ok(None);
        };
        let tpe = self
            .resolver
            .resolve(self.doc, Some(&inner), true)
            .map_err(|e| e.at(&ctx.error_location()))?;

        if tpe.is_complex_object && tpe.is_anonymous {
            let raw = format!("{} items{}", ctx.name, ctx.index);
            let (name, lifted) = self.lift_struct(ctx, &raw, inner, String::new())?;
            ctx.schema.items = Some(Box::new(Items::Single(Box::new(Schema::reference_to(
                &name,
            )))));
            let mut replacement = self.make_gen_schema(ctx.clone())?;
            if lifted.validations.has_validations {
                replacement.validations.has_validations = true;
            }
            return Ok(Some(replacement));
        }

        let branch = ctx.slice_branch(inner);
        let mut element = self.make_gen_schema(branch)?;
        absorb(gen, &element);
        gen.validations.items_enum = element.validations.enum_values.clone();
        element.suffix = "Items".to_string();
        gen.resolved.go_type = format!("[]{}", element.resolved.go_type);
        gen.items = Some(Box::new(element));
        Ok(None)
    }

    /// Promote a schema to a new top-level definition with an invented name.
    ///
    /// The name is registered in the extra schemas and in the document's
    /// definitions table before the recursive build, so a sibling or
    /// self-reference within the new definition resolves instead of looping.
    fn lift_struct(
        &mut self,
        ctx: &GenContext,
        raw_name: &str,
        schema: Schema,
        path: String,
    ) -> GenResult<(String, GenSchema)> {
        let mut name = to_go_name(raw_name);
        if self.resolver.model_name != ctx.name {
            name = to_go_name(&format!("{} {}", self.resolver.model_name, name));
        }

        self.doc.insert_definition(&name, schema.clone());
        self.extra_schemas.insert(
            name.clone(),
            GenSchema {
                name: name.clone(),
                is_virtual: true,
                ..Default::default()
            },
        );

        // the invented definition becomes the model scope for its own walk
        let outer_model = std::mem::replace(&mut self.resolver.model_name, name.clone());
        let mut root = GenContext::named_root(&name, schema);
        root.path = path;
        let built = self.make_gen_schema(root);
        self.resolver.model_name = outer_model;

        let mut built = built?;
        built.is_virtual = true;
        self.extra_schemas.insert(name.clone(), built.clone());
        Ok((name, built))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(definitions: &str) -> Document {
        let json = format!(
            r#"{{"swagger": "2.0", "info": {{"title": "t", "version": "1"}}, "definitions": {definitions}}}"#
        );
        Document::from_json(&json).unwrap()
    }

    fn lower(definitions: &str, name: &str) -> GenDefinition {
        let mut doc = document(definitions);
        lower_definition(&mut doc, name, "models").unwrap()
    }

    #[test]
    fn test_simple_primitive_field() {
        let def = lower(
            r#"{"Thing": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "format": "int64", "minimum": 10, "exclusiveMinimum": true, "maximum": 1000}
                },
                "required": ["id"]
            }}"#,
            "Thing",
        );

        assert_eq!(def.schema.name, "Thing");
        assert!(def.schema.resolved.is_complex_object);
        assert!(def.schema.validations.has_validations);
        assert!(def.extra_schemas.is_empty());

        let id = def.schema.property("id").expect("id property");
        assert!(id.resolved.is_primitive);
        assert_eq!(id.resolved.go_type, "int64");
        assert!(id.validations.required);
        assert_eq!(id.validations.minimum, Some(10.0));
        assert!(id.validations.exclusive_minimum);
        assert_eq!(id.validations.maximum, Some(1000.0));
        assert!(id.validations.has_validations);
        assert_eq!(id.path, "\"id\"");
        assert_eq!(id.value_expression, "m.ID");
    }

    #[test]
    fn test_anonymous_nested_object_lifted() {
        let def = lower(
            r#"{"Order": {
                "type": "object",
                "properties": {
                    "item": {"type": "object", "properties": {"sku": {"type": "string", "minLength": 3}}}
                }
            }}"#,
            "Order",
        );

        let item = def.schema.property("item").expect("item property");
        assert_eq!(item.resolved.go_type, "OrderItem");
        assert!(item.resolved.is_complex_object);

        let lifted = def.extra_schema("OrderItem").expect("lifted OrderItem");
        assert!(lifted.is_virtual);
        let sku = lifted.property("sku").expect("sku property");
        assert_eq!(sku.validations.min_length, Some(3));
        assert!(sku.validations.has_validations);
        assert!(lifted.validations.has_validations);
        // validation monotonicity reaches the root
        assert!(def.schema.validations.has_validations);
    }

    #[test]
    fn test_tuple_with_additional_items() {
        let def = lower(
            r#"{"Pair": {
                "type": "array",
                "items": [{"type": "string"}, {"type": "integer"}],
                "additionalItems": {"type": "boolean"}
            }}"#,
            "Pair",
        );

        assert!(def.schema.resolved.is_tuple);
        assert!(!def.schema.resolved.is_array);
        assert!(def.schema.resolved.has_additional_items);
        assert_eq!(def.schema.resolved.go_type, "Pair");

        let p0 = def.schema.property("P0").expect("P0");
        assert_eq!(p0.resolved.go_type, "string");
        assert!(p0.validations.required);
        let p1 = def.schema.property("P1").expect("P1");
        assert_eq!(p1.resolved.go_type, "int64");

        let additional = def.schema.additional_items.as_deref().expect("additional items");
        assert_eq!(additional.resolved.go_type, "bool");
    }

    #[test]
    fn test_map_of_maps() {
        let def = lower(
            r#"{"M": {"additionalProperties": {"additionalProperties": {"type": "string"}}}}"#,
            "M",
        );

        assert!(def.schema.resolved.is_map);
        assert_eq!(def.schema.resolved.go_type, "map[string]map[string]string");
        assert_eq!(def.schema.additional_properties_depth(), 2);

        let outer = def.schema.additional_properties.as_deref().unwrap();
        assert!(outer.resolved.is_map);
        assert_eq!(outer.suffix, "Value");
        let inner = outer.additional_properties.as_deref().unwrap();
        assert!(inner.resolved.is_primitive);
        assert_eq!(inner.resolved.go_type, "string");
        assert_eq!(inner.key_var, "kk");
    }

    #[test]
    fn test_deep_map_chain_matches_nesting_depth() {
        let def = lower(
            r#"{"M3": {"additionalProperties": {"additionalProperties": {"additionalProperties": {"type": "integer"}}}}}"#,
            "M3",
        );
        assert_eq!(def.schema.additional_properties_depth(), 3);
        assert_eq!(
            def.schema.resolved.go_type,
            "map[string]map[string]map[string]int64"
        );
    }

    #[test]
    fn test_map_of_anonymous_objects_lifted() {
        let def = lower(
            r#"{"Registry": {
                "additionalProperties": {
                    "type": "object",
                    "properties": {"url": {"type": "string", "format": "uri"}}
                }
            }}"#,
            "Registry",
        );

        assert!(def.schema.resolved.is_map);
        assert_eq!(def.schema.resolved.go_type, "map[string]RegistryAnon");
        let lifted = def.extra_schema("RegistryAnon").expect("lifted value object");
        assert!(lifted.property("url").is_some());

        let value = def.schema.additional_properties.as_deref().unwrap();
        assert_eq!(value.resolved.go_type, "RegistryAnon");
        assert!(value.resolved.is_complex_object);
    }

    #[test]
    fn test_all_of_single_ref_with_nullable_marker() {
        let def = lower(
            r##"{
                "Animal": {"type": "object", "properties": {"name": {"type": "string"}}},
                "Cat": {"allOf": [{"x-isnullable": true}, {"$ref": "#/definitions/Animal"}]}
            }"##,
            "Cat",
        );

        assert!(def.schema.all_of.is_empty());
        assert!(def.schema.resolved.is_nullable);
        assert_eq!(def.schema.resolved.go_type, "Animal");
        assert!(def.schema.resolved.is_complex_object);
        assert_eq!(def.depends_on, vec!["Animal".to_string()]);
    }

    #[test]
    fn test_named_ref_body_embeds() {
        let def = lower(
            r##"{
                "Animal": {"type": "object", "properties": {"name": {"type": "string"}}},
                "Dog": {"$ref": "#/definitions/Animal"}
            }"##,
            "Dog",
        );

        assert_eq!(def.schema.resolved.go_type, "Dog");
        assert!(def.schema.resolved.is_complex_object);
        assert_eq!(def.schema.all_of.len(), 1);
        assert_eq!(def.schema.all_of[0].resolved.go_type, "Animal");
        assert_eq!(def.depends_on, vec!["Animal".to_string()]);
    }

    #[test]
    fn test_named_ref_to_primitive_is_alias() {
        let def = lower(
            r##"{
                "Age": {"type": "integer", "format": "int32"},
                "DogAge": {"$ref": "#/definitions/Age"}
            }"##,
            "DogAge",
        );

        assert!(def.schema.all_of.is_empty());
        assert!(def.schema.resolved.is_primitive);
        assert_eq!(def.schema.resolved.go_type, "Age");
    }

    #[test]
    fn test_all_of_composition_branches() {
        let def = lower(
            r##"{
                "Base": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "Extended": {"allOf": [
                    {"$ref": "#/definitions/Base"},
                    {"type": "object", "properties": {"extra": {"type": "string", "maxLength": 5}}}
                ]}
            }"##,
            "Extended",
        );

        assert_eq!(def.schema.all_of.len(), 2);
        assert_eq!(def.schema.all_of[0].resolved.go_type, "Base");
        assert_eq!(def.schema.all_of[0].name, "AO0");
        let second = &def.schema.all_of[1];
        assert_eq!(second.name, "AO1");
        assert!(second.property("extra").unwrap().validations.has_validations);
        // validations flow from composition members to the composite
        assert!(def.schema.validations.has_validations);
    }

    #[test]
    fn test_array_of_anonymous_objects_lifted() {
        let def = lower(
            r#"{"Fleet": {
                "type": "object",
                "properties": {
                    "ships": {
                        "type": "array",
                        "items": {"type": "object", "properties": {"name": {"type": "string", "minLength": 1}}}
                    }
                }
            }}"#,
            "Fleet",
        );

        let ships = def.schema.property("ships").expect("ships");
        assert!(ships.resolved.is_array);
        assert_eq!(ships.resolved.go_type, "[]FleetShipsItems0");
        let element = ships.items.as_deref().expect("items");
        assert_eq!(element.resolved.go_type, "FleetShipsItems0");
        assert_eq!(element.suffix, "Items");

        let lifted = def.extra_schema("FleetShipsItems0").expect("lifted element");
        assert!(lifted.validations.has_validations);
        assert!(def.schema.validations.has_validations);
    }

    #[test]
    fn test_anonymous_tuple_lifted() {
        let def = lower(
            r#"{"Shape": {
                "type": "object",
                "properties": {
                    "point": {"type": "array", "items": [{"type": "number"}, {"type": "number"}]}
                }
            }}"#,
            "Shape",
        );

        let point = def.schema.property("point").expect("point");
        assert_eq!(point.resolved.go_type, "ShapePointTuple0");

        let tuple = def.extra_schema("ShapePointTuple0").expect("lifted tuple");
        assert!(tuple.resolved.is_tuple);
        assert!(!tuple.resolved.is_complex_object);
        assert!(tuple.property("P0").unwrap().validations.required);
        assert!(tuple.property("P1").is_some());
    }

    #[test]
    fn test_single_items_with_additional_items_rejected() {
        let mut doc = document(
            r#"{"Bad": {"type": "array", "items": {"type": "string"}, "additionalItems": {"type": "integer"}}}"#,
        );
        let err = lower_definition(&mut doc, "Bad", "models").unwrap_err();
        assert!(matches!(err, GenError::InvalidCombination { .. }));
    }

    #[test]
    fn test_properties_sorted_by_name() {
        let def = lower(
            r#"{"Zoo": {
                "type": "object",
                "properties": {
                    "zebra": {"type": "string"},
                    "ant": {"type": "string"},
                    "mole": {"type": "string"}
                }
            }}"#,
            "Zoo",
        );
        let names: Vec<&str> = def.schema.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ant", "mole", "zebra"]);
    }

    #[test]
    fn test_required_suppressed_by_default_and_read_only() {
        let def = lower(
            r#"{"Config": {
                "type": "object",
                "properties": {
                    "mode": {"type": "string", "default": "fast"},
                    "etag": {"type": "string", "readOnly": true},
                    "name": {"type": "string"}
                },
                "required": ["mode", "etag", "name"]
            }}"#,
            "Config",
        );

        assert!(!def.schema.property("mode").unwrap().validations.required);
        assert!(!def.schema.property("etag").unwrap().validations.required);
        assert!(def.schema.property("etag").unwrap().read_only);
        assert!(def.schema.property("name").unwrap().validations.required);
    }

    #[test]
    fn test_named_object_with_additional_properties() {
        let def = lower(
            r#"{"Mixed": {
                "type": "object",
                "properties": {"known": {"type": "string"}},
                "additionalProperties": {"type": "integer"}
            }}"#,
            "Mixed",
        );

        assert!(def.schema.is_additional_properties);
        assert!(!def.schema.resolved.is_complex_object);
        assert!(!def.schema.resolved.is_map);
        assert!(def.schema.has_additional_properties);
        let value = def.schema.additional_properties.as_deref().unwrap();
        assert_eq!(value.resolved.go_type, "int64");
        // map lookups run through the property accessor on the struct
        assert_eq!(def.schema.value_expression, "m.Mixed");
    }

    #[test]
    fn test_xml_name() {
        let def = lower(
            r#"{"Tagged": {
                "type": "object",
                "xml": {"name": "tagged"},
                "properties": {
                    "id": {"type": "integer", "xml": {"name": "ident", "attribute": true}}
                }
            }}"#,
            "Tagged",
        );
        assert_eq!(def.schema.xml_name, "tagged");
        assert_eq!(def.schema.property("id").unwrap().xml_name, "ident,attr");
    }

    #[test]
    fn test_enum_carries_validations() {
        let def = lower(
            r#"{"Status": {
                "type": "object",
                "properties": {
                    "state": {"type": "string", "enum": ["on", "off"]}
                }
            }}"#,
            "Status",
        );
        let state = def.schema.property("state").unwrap();
        assert_eq!(state.validations.enum_values.len(), 2);
        assert!(state.validations.has_validations);
        assert!(def.schema.validations.has_validations);
    }

    #[test]
    fn test_items_enum_copied_to_array() {
        let def = lower(
            r#"{"Palette": {
                "type": "object",
                "properties": {
                    "colors": {"type": "array", "items": {"type": "string", "enum": ["red", "green"]}}
                }
            }}"#,
            "Palette",
        );
        let colors = def.schema.property("colors").unwrap();
        assert_eq!(colors.validations.items_enum.len(), 2);
    }

    #[test]
    fn test_slice_validations() {
        let def = lower(
            r#"{"List": {
                "type": "object",
                "properties": {
                    "tags": {"type": "array", "items": {"type": "string"}, "minItems": 1, "maxItems": 10, "uniqueItems": true}
                }
            }}"#,
            "List",
        );
        let tags = def.schema.property("tags").unwrap();
        assert!(tags.validations.has_slice_validations);
        assert_eq!(tags.validations.min_items, Some(1));
        assert_eq!(tags.validations.max_items, Some(10));
        assert!(tags.validations.unique_items);
        assert_eq!(tags.index_var, "i");
        assert_eq!(tags.items.as_deref().unwrap().index_var, "ii");
    }

    #[test]
    fn test_self_referential_definition_terminates() {
        let def = lower(
            r##"{"Node": {
                "type": "object",
                "properties": {
                    "children": {"type": "array", "items": {"$ref": "#/definitions/Node"}},
                    "value": {"type": "string"}
                }
            }}"##,
            "Node",
        );
        let children = def.schema.property("children").unwrap();
        assert_eq!(children.resolved.go_type, "[]Node");
    }

    #[test]
    fn test_lift_names_are_unique_and_deterministic() {
        let spec = r#"{"Outer": {
            "type": "object",
            "properties": {
                "first": {"type": "object", "properties": {"a": {"type": "string"}}},
                "second": {"type": "object", "properties": {"b": {"type": "string"}}}
            }
        }}"#;
        let first = lower(spec, "Outer");
        let second = lower(spec, "Outer");

        let names: Vec<&str> = first.extra_schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["OuterFirst", "OuterSecond"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_imports_follow_validations() {
        let with = lower(
            r#"{"V": {"type": "object", "properties": {"n": {"type": "integer", "minimum": 1}}}}"#,
            "V",
        );
        assert!(with
            .default_imports
            .iter()
            .any(|i| i.ends_with("/validate")));

        let without = lower(
            r#"{"P": {"type": "object", "properties": {"n": {"type": "integer"}}}}"#,
            "P",
        );
        assert!(without.default_imports.is_empty());
    }

    #[test]
    fn test_lower_inline_ref_uses_models_package() {
        let mut doc = document(r#"{"Pet": {"type": "object", "properties": {"n": {"type": "string"}}}}"#);
        let (gen, extras) =
            lower_inline(&mut doc, "models", "body", Schema::reference_to("Pet")).unwrap();
        assert_eq!(gen.resolved.go_type, "models.Pet");
        assert!(extras.is_empty());
    }
}
