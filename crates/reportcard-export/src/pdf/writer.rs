//! Serialise a [`ReportLayout`] with `pdf-writer`.

use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::logo::RasterImage;
use crate::pdf::fonts::{self, FontFace, runs};
use crate::pdf::layout::{Area, DrawOp, PageLayout, ReportLayout};
use crate::styles::Rgb;

const COMPRESSION_LEVEL: u8 = 6;

struct FontRefs {
    helvetica: Ref,
    helvetica_bold: Ref,
    cjk: Ref,
    cjk_descendant: Ref,
    cjk_descriptor: Ref,
}

/// Write the layout as a complete PDF file.
pub fn write_pdf(layout: &ReportLayout) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let info_id = alloc.bump();
    let font_refs = FontRefs {
        helvetica: alloc.bump(),
        helvetica_bold: alloc.bump(),
        cjk: alloc.bump(),
        cjk_descendant: alloc.bump(),
        cjk_descriptor: alloc.bump(),
    };

    let image_ids: Vec<(Ref, Option<Ref>)> = layout
        .images
        .iter()
        .map(|image| (alloc.bump(), image.alpha.as_ref().map(|_| alloc.bump())))
        .collect();
    let page_ids: Vec<(Ref, Ref)> = layout
        .pages
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(&layout.title))
        .producer(TextStr(concat!("reportcard ", env!("CARGO_PKG_VERSION"))));

    write_fonts(&mut pdf, &font_refs);

    for (image, (id, mask_id)) in layout.images.iter().zip(&image_ids) {
        write_image(&mut pdf, image, *id, *mask_id);
    }

    let media_box = Rect::new(0.0, 0.0, layout.page_width, layout.page_height);
    for (page, (page_id, content_id)) in layout.pages.iter().zip(&page_ids) {
        {
            let mut page_dict = pdf.page(*page_id);
            page_dict.media_box(media_box);
            page_dict.parent(page_tree_id);
            page_dict.contents(*content_id);

            let mut resources = page_dict.resources();
            resources
                .fonts()
                .pair(fonts::HELVETICA, font_refs.helvetica)
                .pair(fonts::HELVETICA_BOLD, font_refs.helvetica_bold)
                .pair(fonts::CJK, font_refs.cjk);
            if !image_ids.is_empty() {
                let mut x_objects = resources.x_objects();
                for (i, (id, _)) in image_ids.iter().enumerate() {
                    let name = image_name(i);
                    x_objects.pair(Name(name.as_bytes()), *id);
                }
                x_objects.finish();
            }
            resources.finish();
            page_dict.finish();
        }

        let content = page_content(page);
        pdf.stream(*content_id, &compress_to_vec_zlib(&content, COMPRESSION_LEVEL))
            .filter(Filter::FlateDecode);
    }

    pdf.finish()
}

fn image_name(index: usize) -> String {
    format!("Im{index}")
}

fn write_fonts(pdf: &mut Pdf, refs: &FontRefs) {
    pdf.type1_font(refs.helvetica)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(refs.helvetica_bold)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.type0_font(refs.cjk)
        .base_font(fonts::CJK_BASE_FONT)
        .encoding_predefined(fonts::CJK_CMAP)
        .descendant_font(refs.cjk_descendant);

    let mut cid = pdf.cid_font(refs.cjk_descendant);
    cid.subtype(CidFontType::Type0);
    cid.base_font(fonts::CJK_BASE_FONT);
    cid.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"CNS1"),
        supplement: 4,
    });
    cid.font_descriptor(refs.cjk_descriptor);
    cid.default_width(1000.0);
    cid.widths().same(1, 95, 500.0);
    cid.finish();

    pdf.font_descriptor(refs.cjk_descriptor)
        .name(fonts::CJK_BASE_FONT)
        .flags(FontFlags::SYMBOLIC)
        .bbox(Rect::new(-160.0, -259.0, 1015.0, 888.0))
        .italic_angle(0.0)
        .ascent(880.0)
        .descent(-120.0)
        .cap_height(880.0)
        .stem_v(93.0);
}

fn write_image(pdf: &mut Pdf, image: &RasterImage, id: Ref, mask_id: Option<Ref>) {
    let data = compress_to_vec_zlib(&image.rgb, COMPRESSION_LEVEL);
    let mut xobject = pdf.image_xobject(id, &data);
    xobject.filter(Filter::FlateDecode);
    xobject.width(image.width as i32);
    xobject.height(image.height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    if let Some(mask_id) = mask_id {
        xobject.s_mask(mask_id);
    }
    xobject.finish();

    if let (Some(mask_id), Some(alpha)) = (mask_id, &image.alpha) {
        let data = compress_to_vec_zlib(alpha, COMPRESSION_LEVEL);
        let mut mask = pdf.image_xobject(mask_id, &data);
        mask.filter(Filter::FlateDecode);
        mask.width(image.width as i32);
        mask.height(image.height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask.finish();
    }
}

fn page_content(page: &PageLayout) -> Vec<u8> {
    let mut content = Content::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                face,
                color,
                text,
            } => draw_text(&mut content, *x, *y, *size, *face, *color, text),
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let [r, g, b] = color.unit();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width);
                content.move_to(from.0, from.1);
                content.line_to(to.0, to.1);
                content.stroke();
            }
            DrawOp::FillRect { area, color } => {
                let [r, g, b] = color.unit();
                content.set_fill_rgb(r, g, b);
                content.rect(area.x, area.y, area.width, area.height);
                content.fill_nonzero();
            }
            DrawOp::Image { index, area, clip } => {
                draw_image(&mut content, *index, *area, *clip);
            }
        }
    }

    content.finish().to_vec()
}

fn draw_text(content: &mut Content, x: f32, y: f32, size: f32, face: FontFace, color: Rgb, text: &str) {
    let [r, g, b] = color.unit();
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.next_line(x, y);
    for run in runs(text) {
        content.set_font(run.font(face), size);
        content.show(Str(&run.encode()));
    }
    content.end_text();
}

fn draw_image(content: &mut Content, index: usize, area: Area, clip: Option<Area>) {
    let name = image_name(index);
    content.save_state();
    if let Some(clip) = clip {
        content.rect(clip.x, clip.y, clip.width, clip.height);
        content.clip_nonzero();
        content.end_path();
    }
    content.transform([area.width, 0.0, 0.0, area.height, area.x, area.y]);
    content.x_object(Name(name.as_bytes()));
    content.restore_state();
}
